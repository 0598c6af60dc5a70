//! The public `Tree` type: `list`, `create`, `remove` and `move_node`.
//!
//! Every operation parses its path(s), asks the [`locker`] module for a
//! lock chain ending at the right node in the right mode, does a
//! constant-time mutation of a child map, and lets the lock chain drop
//! (releasing everything it holds, innermost node first). No operation
//! here ever touches a [`Synchronizer`](crate::sync::Synchronizer)
//! directly.

use crate::error::TreeError;
use crate::locker::{self, LockedChain};
use crate::logger::{Log, NoopLogger};
use crate::node::Node;
use crate::path;
use std::sync::Arc;

/// An in-memory, concurrent hierarchical namespace of folders.
///
/// `Logger` is a hook for observing node allocation and destruction
/// (see [`Log`]); most users want the default [`NoopLogger`].
pub struct Tree<Logger: Log = NoopLogger> {
    root: Arc<Node<Logger>>,
}

impl<Logger: Log> Tree<Logger> {
    /// Creates a fresh tree containing only the root folder `/`.
    pub fn new() -> Self {
        Tree {
            root: Node::new_root(),
        }
    }

    /// Returns the comma-separated names of `path`'s direct children, or
    /// `None` if `path` is invalid or does not name an existing folder.
    ///
    /// The returned string is a snapshot taken while `path`'s node was
    /// read-locked: no concurrent `create`/`remove`/`move` could have
    /// mutated that child set while the snapshot was taken.
    pub fn list(&self, path: &str) -> Option<String> {
        if !path::is_valid(path) {
            return None;
        }
        let chain = locker::read_lock_path(&self.root, path)?;
        let names = chain.target().child_names();
        log::debug!("list({:?}) -> {} entries", path, names.len());
        Some(render_listing(&names))
    }

    /// Creates an empty folder at `path`.
    pub fn create(&self, path: &str) -> Result<(), TreeError> {
        if !path::is_valid(path) {
            return Err(TreeError::InvalidPath);
        }
        if path::is_root(path) {
            return Err(TreeError::AlreadyExists);
        }
        let (parent_path, name) =
            path::parent_and_name(path).expect("non-root path has a parent");

        let chain = locker::read_lock_prefix_write_lock_tail(&self.root, parent_path)
            .ok_or(TreeError::NotFound)?;
        let parent = chain.target();

        if parent.has_child(name) {
            log::debug!("create({:?}) -> already exists", path);
            return Err(TreeError::AlreadyExists);
        }

        let child = Node::new_child(parent);
        parent.insert_child(Arc::from(name), child);
        log::debug!("create({:?}) -> ok", path);
        Ok(())
    }

    /// Removes the empty folder at `path`.
    pub fn remove(&self, path: &str) -> Result<(), TreeError> {
        if !path::is_valid(path) {
            return Err(TreeError::InvalidPath);
        }
        if path::is_root(path) {
            return Err(TreeError::RootForbidden);
        }
        let (parent_path, name) =
            path::parent_and_name(path).expect("non-root path has a parent");

        let chain = locker::read_lock_prefix_write_lock_tail(&self.root, parent_path)
            .ok_or(TreeError::NotFound)?;
        let parent = chain.target();

        let child = match parent.get_child(name) {
            Some(child) => child,
            None => {
                log::debug!("remove({:?}) -> not found", path);
                return Err(TreeError::NotFound);
            }
        };

        // Safe because `parent` is write-locked by this call: no new
        // operation can descend into `child` while we wait here.
        child.await_subtree_quiescent();

        if !child.is_empty() {
            log::debug!("remove({:?}) -> not empty", path);
            return Err(TreeError::NotEmpty);
        }

        parent.remove_child(name);
        log::debug!("remove({:?}) -> ok", path);
        Ok(())
    }

    /// Moves the folder at `source` to `target`, which must not yet
    /// exist (its parent must).
    pub fn move_node(&self, source: &str, target: &str) -> Result<(), TreeError> {
        if !path::is_valid(source) || !path::is_valid(target) {
            return Err(TreeError::InvalidPath);
        }
        if path::is_root(source) {
            return Err(TreeError::RootForbidden);
        }
        if path::is_root(target) {
            return Err(TreeError::AlreadyExists);
        }
        // Pure string check, same as the original: does not require
        // `source` to exist.
        if path::is_strict_ancestor(source, target) {
            return Err(TreeError::SourceIsAncestor);
        }
        if source == target {
            let found = locker::read_lock_path(&self.root, source).is_some();
            log::debug!("move({:?}, {:?}) -> self, found={}", source, target, found);
            return if found { Ok(()) } else { Err(TreeError::NotFound) };
        }
        if path::is_strict_ancestor(target, source) {
            let found = locker::read_lock_path(&self.root, source).is_some();
            log::debug!(
                "move({:?}, {:?}) -> target is ancestor, found={}",
                source,
                target,
                found
            );
            return if found {
                Err(TreeError::AlreadyExists)
            } else {
                Err(TreeError::NotFound)
            };
        }

        let (path_sp, source_name) =
            path::parent_and_name(source).expect("non-root path has a parent");
        let (path_tp, target_name) =
            path::parent_and_name(target).expect("non-root path has a parent");
        let lca_path = path::longest_common_prefix(path_sp, path_tp);

        // Chain A: root..lca, lca write-locked. Dropped last (declared
        // first), after chains C and B release.
        let chain_a = locker::read_lock_prefix_write_lock_tail(&self.root, lca_path)
            .ok_or(TreeError::NotFound)?;
        let lca = Arc::clone(chain_a.target());

        // Chain B: lca..source_parent, source_parent write-locked.
        let mut chain_b = LockedChain::new();
        let source_parent = {
            let relative = path::suffix_from(lca_path, path_sp);
            if relative.len() > 1 {
                chain_b = locker::relative_lock_prefix_write_tail(&lca, relative)
                    .ok_or(TreeError::NotFound)?;
                Arc::clone(chain_b.target())
            } else {
                Arc::clone(&lca)
            }
        };

        let source_node = match source_parent.get_child(source_name) {
            Some(node) => node,
            None => {
                log::debug!("move({:?}, {:?}) -> source not found", source, target);
                return Err(TreeError::NotFound);
            }
        };

        // No one can enter `source_node` from above: every path from
        // root to it is locked by this operation (via chain A and B).
        source_node.await_subtree_quiescent();

        // Chain C: lca..target_parent, target_parent write-locked.
        let mut chain_c = LockedChain::new();
        let target_parent = {
            let relative = path::suffix_from(lca_path, path_tp);
            if relative.len() > 1 {
                chain_c = locker::relative_lock_prefix_write_tail(&lca, relative)
                    .ok_or(TreeError::NotFound)?;
                Arc::clone(chain_c.target())
            } else {
                Arc::clone(&lca)
            }
        };

        if target_parent.has_child(target_name) {
            log::debug!("move({:?}, {:?}) -> target already exists", source, target);
            return Err(TreeError::AlreadyExists);
        }

        // The commit point: this is the only place two child maps are
        // mutated for a single operation, and it happens entirely under
        // locks A ∪ B ∪ C plus source_node's proven quiescence.
        let moved = source_parent
            .remove_child(source_name)
            .expect("source_node was just found under source_parent's write lock");
        moved.set_parent(&target_parent);
        target_parent.insert_child(Arc::from(target_name), moved);

        log::debug!("move({:?}, {:?}) -> ok", source, target);
        Ok(())
    }
}

impl<Logger: Log> Default for Tree<Logger> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a folder's children as a comma-separated list with no
/// trailing separator, `""` for an empty folder. Order is unspecified
/// but stable for the snapshot that produced `names`.
fn render_listing(names: &[Arc<str>]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(name);
    }
    out
}
