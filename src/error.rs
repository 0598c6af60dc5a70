//! Non-fatal error outcomes of `create`, `remove` and `move`.
//!
//! `list` has no error type of its own: a missing or invalid target is
//! reported as `None`, since there is nothing beyond "absent" to
//! distinguish (see spec §6).
//!
//! Anything short of one of these variants being returned is, per spec
//! §7, a fatal condition: a poisoned lock or failed allocation is not
//! representable here and must panic rather than surface as a `TreeError`.

/// The non-fatal outcomes of a failed folder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The given path is not a syntactically valid folder path.
    #[error("invalid path")]
    InvalidPath,
    /// A folder already exists under that name.
    #[error("folder already exists")]
    AlreadyExists,
    /// Some component along the path does not exist.
    #[error("no such folder")]
    NotFound,
    /// `remove` was called on a folder that still has children.
    #[error("folder not empty")]
    NotEmpty,
    /// The operation is not permitted on the root folder.
    #[error("operation not permitted on the root folder")]
    RootForbidden,
    /// `move`'s target is a descendant of its source.
    #[error("cannot move a folder into its own descendant")]
    SourceIsAncestor,
}
