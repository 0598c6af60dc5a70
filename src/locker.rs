//! Hand-over-hand path walkers.
//!
//! Every walker here acquires locks strictly top-down, shallowest node
//! first, which is what makes the whole crate deadlock-free (spec §5):
//! no operation ever acquires a lock on an ancestor after acquiring one
//! on a descendant. On a missing path component, the chain built so far
//! is simply dropped, which releases everything acquired by this call in
//! reverse (deepest-first) order; see [`LockedChain`]'s `Drop` impl.

use crate::logger::Log;
use crate::node::Node;
use crate::path;
use std::sync::Arc;

enum Mode {
    Read,
    Write,
}

/// A run of locks held on a root-to-node path, in acquisition order.
/// Releases them in reverse order when dropped.
pub(crate) struct LockedChain<Logger: Log> {
    held: Vec<(Arc<Node<Logger>>, Mode)>,
}

impl<Logger: Log> LockedChain<Logger> {
    pub(crate) fn new() -> Self {
        LockedChain { held: Vec::new() }
    }

    fn push_read(&mut self, node: Arc<Node<Logger>>) {
        node.acquire_read();
        self.held.push((node, Mode::Read));
    }

    fn push_write(&mut self, node: Arc<Node<Logger>>) {
        node.acquire_write();
        self.held.push((node, Mode::Write));
    }

    /// The last (and, for a successful lookup, innermost) node in the
    /// chain, the one named by the path this chain was built for.
    pub(crate) fn target(&self) -> &Arc<Node<Logger>> {
        &self.held.last().expect("chain is never empty once built").0
    }
}

impl<Logger: Log> Drop for LockedChain<Logger> {
    fn drop(&mut self) {
        while let Some((node, mode)) = self.held.pop() {
            match mode {
                Mode::Read => node.release_read(),
                Mode::Write => node.release_write(),
            }
        }
    }
}

/// Read-locks every node from `root` down to the node named by `path`,
/// inclusive. Returns `None` if `path` does not exist, having already
/// rolled back anything acquired along the way.
pub(crate) fn read_lock_path<Logger: Log>(
    root: &Arc<Node<Logger>>,
    path: &str,
) -> Option<LockedChain<Logger>> {
    let mut chain = LockedChain::new();
    let mut current = Arc::clone(root);
    let mut remaining = path;
    loop {
        chain.push_read(Arc::clone(&current));
        match path::split_first(remaining) {
            None => return Some(chain),
            Some((name, rest)) => match current.get_child(name) {
                Some(child) => {
                    current = child;
                    remaining = rest;
                }
                None => return None,
            },
        }
    }
}

/// Read-locks every node from `root` down to (but not including) the
/// node named by `path`, then write-locks that node. Returns `None` if
/// `path` does not exist.
pub(crate) fn read_lock_prefix_write_lock_tail<Logger: Log>(
    root: &Arc<Node<Logger>>,
    path: &str,
) -> Option<LockedChain<Logger>> {
    let mut chain = LockedChain::new();
    let mut current = Arc::clone(root);
    let mut remaining = path;
    loop {
        match path::split_first(remaining) {
            None => {
                chain.push_write(Arc::clone(&current));
                return Some(chain);
            }
            Some((name, rest)) => {
                chain.push_read(Arc::clone(&current));
                match current.get_child(name) {
                    Some(child) => {
                        current = child;
                        remaining = rest;
                    }
                    None => return None,
                }
            }
        }
    }
}

/// Like [`read_lock_prefix_write_lock_tail`], but starting from a
/// `boundary` node the caller already holds locked (typically the LCA
/// written by `move`). `boundary` itself is never locked or unlocked by
/// this call; on a miss, only locks taken *by this call* are rolled
/// back, leaving `boundary` exactly as the caller left it.
///
/// `relative_path` must name at least one component below `boundary`
/// (callers skip this walker entirely when the target *is* `boundary`).
pub(crate) fn relative_lock_prefix_write_tail<Logger: Log>(
    boundary: &Arc<Node<Logger>>,
    relative_path: &str,
) -> Option<LockedChain<Logger>> {
    debug_assert!(relative_path.len() > 1);
    let mut chain = LockedChain::new();
    let mut current = Arc::clone(boundary);
    let mut remaining = relative_path;
    loop {
        let (name, rest) =
            path::split_first(remaining).expect("relative_path always has a component left here");
        let child = current.get_child(name)?;
        match path::split_first(rest) {
            None => {
                chain.push_write(Arc::clone(&child));
                return Some(chain);
            }
            Some(_) => {
                chain.push_read(Arc::clone(&child));
                current = child;
                remaining = rest;
            }
        }
    }
}
