//! An in-memory, concurrent hierarchical namespace of folders.
//!
//! A [`Tree`] is a rooted namespace addressed by absolute paths such as
//! `/a/bc/`. Folders carry no payload of their own, only a set of named
//! children; the crate's entire value is in making `list`, `create`,
//! `remove` and `move` safe and maximally parallel under any concurrent
//! mix of calls from many threads, via per-node reader/writer locking
//! and hand-over-hand path traversal (see [`sync`] and [`locker`]).

mod error;
mod locker;
mod logger;
mod map;
mod node;
mod path;
mod sync;
mod tree;

pub use self::error::TreeError;
pub use self::logger::{Log, NoopLogger, TracingLogger};
pub use self::tree::Tree;
