//! Shared, append-only marker storage
//!
//! The ingestion loop is the only writer and the renderer reads. Every
//! access goes through one mutex:
//! - appends are serialized with each other
//! - a chunk appended with [`MarkerStore::extend`] becomes visible all at once
//! - [`MarkerStore::for_each`] holds the lock for the whole traversal, so no
//!   append can land halfway through a draw
//!
//! Callers never hold the lock across I/O; the guard never leaves this module.

use shared::Marker;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle to the marker sequence. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Arc<Mutex<Vec<Marker>>>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one marker at the end.
    pub fn append(&self, marker: Marker) {
        self.lock().push(marker);
    }

    /// Appends a batch in order under a single lock acquisition.
    ///
    /// Returns the store length after the append.
    pub fn extend<I>(&self, markers: I) -> usize
    where
        I: IntoIterator<Item = Marker>,
    {
        let mut guard = self.lock();
        guard.extend(markers);
        guard.len()
    }

    /// Consistent copy of every marker in arrival order.
    pub fn snapshot(&self) -> Vec<Marker> {
        self.lock().clone()
    }

    /// Visits every marker in arrival order while holding the lock.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Marker),
    {
        let guard = self.lock();
        for marker in guard.iter() {
            f(marker);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Markers are only ever pushed, so a panic elsewhere cannot leave the
    // vector half-written; keep serving after a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, Vec<Marker>> {
        self.markers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
