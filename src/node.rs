//! A single folder in the tree.

use crate::logger::{Log, NoopLogger};
use crate::map::ChildMap;
use crate::sync::Synchronizer;
use parking_lot::Mutex;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// A folder. Carries no payload of its own, only its children and the
/// [`Synchronizer`] that arbitrates concurrent access to them (spec §3).
///
/// Children are owned by their parent through `children`; the `parent`
/// back-link is non-owning (a `Weak`) and exists only so the crate's
/// consumers could, in principle, walk upward; the path-locker never
/// relies on it, since every lock chain it builds already holds owned
/// references to every ancestor it visited on the way down.
pub struct Node<Logger: Log = NoopLogger> {
    pub(crate) sync: Synchronizer,
    children: Mutex<ChildMap<Arc<str>, Arc<Node<Logger>>>>,
    // Written by `move` (see `set_parent`) to keep the data model of
    // spec §3 complete; none of the four operations need to read it
    // back, since the path-locker always carries its own owned chain of
    // ancestors rather than re-deriving them from this link.
    #[allow(dead_code)]
    parent: Mutex<Option<Weak<Node<Logger>>>>,
    marker: PhantomData<Logger>,
}

impl<Logger: Log> Node<Logger> {
    pub(crate) fn new_root() -> Arc<Self> {
        let node = Arc::new(Node {
            sync: Synchronizer::new(),
            children: Mutex::new(ChildMap::default()),
            parent: Mutex::new(None),
            marker: PhantomData,
        });
        Logger::log_new(Self::addr_of(&node));
        node
    }

    pub(crate) fn new_child(parent: &Arc<Self>) -> Arc<Self> {
        let node = Arc::new(Node {
            sync: Synchronizer::new(),
            children: Mutex::new(ChildMap::default()),
            parent: Mutex::new(Some(Arc::downgrade(parent))),
            marker: PhantomData,
        });
        Logger::log_new(Self::addr_of(&node));
        node
    }

    fn addr_of(node: &Arc<Self>) -> *const c_void {
        Arc::as_ptr(node) as *const c_void
    }

    pub(crate) fn acquire_read(&self) {
        self.sync.acquire_read();
    }

    pub(crate) fn release_read(&self) {
        self.sync.release_read();
    }

    pub(crate) fn acquire_write(&self) {
        self.sync.acquire_write();
    }

    pub(crate) fn release_write(&self) {
        self.sync.release_write();
    }

    pub(crate) fn await_subtree_quiescent(&self) {
        self.sync.await_subtree_quiescent();
    }

    pub(crate) fn get_child(&self, name: &str) -> Option<Arc<Self>> {
        self.children.lock().get(name).cloned()
    }

    pub(crate) fn has_child(&self, name: &str) -> bool {
        self.children.lock().get(name).is_some()
    }

    pub(crate) fn insert_child(&self, name: Arc<str>, child: Arc<Self>) {
        self.children.lock().insert(name, child);
    }

    pub(crate) fn remove_child(&self, name: &str) -> Option<Arc<Self>> {
        self.children.lock().remove(name)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.children.lock().is_empty()
    }

    pub(crate) fn child_names(&self) -> Vec<Arc<str>> {
        self.children.lock().keys().into_iter().cloned().collect()
    }

    /// Re-points this node's parent back-link. Called only by `move`,
    /// while every path into this node is locked by the caller and the
    /// node has just been proven subtree-quiescent, so no concurrent
    /// reader can observe a torn link.
    pub(crate) fn set_parent(&self, parent: &Arc<Self>) {
        *self.parent.lock() = Some(Arc::downgrade(parent));
    }
}

impl<Logger: Log> Drop for Node<Logger> {
    fn drop(&mut self) {
        Logger::log_drop(self as *const Self as *const c_void);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NoopLogger;

    #[test]
    fn child_lifecycle() {
        let root: Arc<Node<NoopLogger>> = Node::new_root();
        assert!(root.is_empty());

        let a = Node::new_child(&root);
        root.insert_child(Arc::from("a"), a);
        assert!(!root.is_empty());
        assert!(root.has_child("a"));
        assert!(root.get_child("b").is_none());

        let removed = root.remove_child("a");
        assert!(removed.is_some());
        assert!(root.is_empty());
    }
}
