//! The per-node reader/writer/subtree-quiescence primitive.
//!
//! This is the hard part of the crate: a node's [`Synchronizer`] arbitrates
//! between readers, a single writer, and a "wait until my subtree is empty"
//! barrier used by `remove` and `move`, all driven off one mutex-protected
//! counter block plus three condition variables. It never touches a node's
//! children map or its parent link directly; it only ever answers "may I
//! proceed" / "I'm done" for whoever is walking the path-locker.
//!
//! Writer preference: a reader that finds a writer holding or waiting parks,
//! so a steady stream of writers can't be starved by readers, at the cost of
//! accepted reader starvation under a steady stream of writers (see spec
//! §5, "Starvation").

use parking_lot::{Condvar, Mutex};

#[derive(Default)]
struct Counters {
    read_count: usize,
    write_count: usize,
    read_wait: usize,
    write_wait: usize,
    subtree_count: usize,
}

/// A per-node lock. See the module documentation for the protocol.
pub(crate) struct Synchronizer {
    counters: Mutex<Counters>,
    read_cond: Condvar,
    write_cond: Condvar,
    subtree_cond: Condvar,
}

impl Synchronizer {
    pub(crate) fn new() -> Self {
        Synchronizer {
            counters: Mutex::new(Counters::default()),
            read_cond: Condvar::new(),
            write_cond: Condvar::new(),
            subtree_cond: Condvar::new(),
        }
    }

    /// Blocks until a read-lock on this node can be taken, then takes it.
    /// Bumps `subtree_count` first, as every operation does on every node
    /// it touches, so an ancestor's `await_subtree_quiescent` sees us.
    pub(crate) fn acquire_read(&self) {
        let mut c = self.counters.lock();
        c.subtree_count += 1;

        if c.write_wait > 0 || c.write_count > 0 {
            c.read_wait += 1;
            while c.write_count > 0 {
                self.read_cond.wait(&mut c);
            }
            c.read_wait -= 1;
        }

        // Cascade-wake any other readers parked behind us, so a whole
        // batch proceeds once the writer that blocked us is gone.
        c.read_count += 1;
        self.read_cond.notify_one();
    }

    pub(crate) fn release_read(&self) {
        let mut c = self.counters.lock();
        c.read_count -= 1;
        if c.read_count == 0 {
            self.write_cond.notify_one();
        }
        c.subtree_count -= 1;
        if c.subtree_count <= 1 {
            self.subtree_cond.notify_one();
        }
    }

    /// Blocks until a write-lock on this node can be taken, then takes it.
    pub(crate) fn acquire_write(&self) {
        let mut c = self.counters.lock();
        c.subtree_count += 1;

        while c.write_count > 0 || c.read_count > 0 {
            c.write_wait += 1;
            self.write_cond.wait(&mut c);
            c.write_wait -= 1;
        }

        c.write_count += 1;
    }

    pub(crate) fn release_write(&self) {
        let mut c = self.counters.lock();
        c.write_count -= 1;

        if c.read_wait > 0 {
            self.read_cond.notify_one();
        } else {
            self.write_cond.notify_one();
        }

        c.subtree_count -= 1;
        if c.subtree_count <= 1 {
            self.subtree_cond.notify_one();
        }
    }

    /// Blocks until no in-flight operation (other than the caller) holds
    /// any lock on this node or any node beneath it.
    ///
    /// Safe to call only while some ancestor of this node is write-locked
    /// by the same operation, which is what prevents any *new* operation
    /// from entering this subtree while we wait.
    pub(crate) fn await_subtree_quiescent(&self) {
        let mut c = self.counters.lock();
        c.subtree_count += 1;
        while c.subtree_count > 1 {
            self.subtree_cond.wait(&mut c);
        }
        c.subtree_count -= 1;
    }
}
