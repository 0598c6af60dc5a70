use std::ffi::c_void;

/// A trait to log creation and destruction of nodes in a tree.
///
/// This is a structural hook, not the crate's operational logging: it
/// fires at exactly the two points a node's lifetime begins and ends, so
/// tests can assert on allocation counts deterministically. For ordinary
/// operational visibility (lock contention, operation outcomes), the
/// crate also emits through the `log` facade regardless of which `Log`
/// implementor is in use; see [`TracingLogger`] for a `Log` impl that
/// additionally forwards through that facade.
pub trait Log {
    /// Logs the creation of a new node.
    fn log_new(ptr: *const c_void);

    /// Logs the destruction of a node.
    fn log_drop(ptr: *const c_void);
}

/// A logger that doesn't actually log anything.
pub struct NoopLogger;

impl Log for NoopLogger {
    fn log_new(_ptr: *const c_void) {}
    fn log_drop(_ptr: *const c_void) {}
}

/// A logger that forwards node creation and destruction through the
/// `log` facade at trace level, keyed by the node's address.
pub struct TracingLogger;

impl Log for TracingLogger {
    fn log_new(ptr: *const c_void) {
        log::trace!("node {:p} created", ptr);
    }

    fn log_drop(ptr: *const c_void) {
        log::trace!("node {:p} dropped", ptr);
    }
}
