//! Capabilities the hosting editor provides to a watcher.

/// Tells the host that persisted watcher state changed and must be saved.
pub trait DirtyMarker {
    fn mark_dirty(&self);
}

impl<F: Fn()> DirtyMarker for F {
    fn mark_dirty(&self) {
        self()
    }
}
