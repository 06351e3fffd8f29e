use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

use super::types::RawHandle;

/// Thread-safe map from live OS handle to the device path it was opened
/// with.
///
/// One mutex covers the whole map so register/lookup/remove are
/// linearizable with respect to each other: a read during one operation
/// never observes a half-updated entry from another. Entries are created
/// only after a successful open and removed only after a successful
/// close; in between, the handle identity appears at most once.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    ports: Mutex<HashMap<RawHandle, String>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            ports: Mutex::new(HashMap::new()),
        }
    }

    /// Inserts or overwrites the mapping for `handle`.
    ///
    /// Overwrite handles OS identity reuse: if a close was never observed
    /// (or the close hook missed it), a new open on the same numeric
    /// value rebinds the identity to the new path.
    pub fn register(&self, handle: RawHandle, path: &str) {
        let mut ports = self.ports.lock().unwrap();
        if let Some(previous) = ports.insert(handle, path.to_string()) {
            debug!(
                "[comtap] handle {} rebound from {} to {}",
                handle, previous, path
            );
        }
    }

    /// Returns the device path for `handle`, if it is currently tracked.
    pub fn lookup(&self, handle: RawHandle) -> Option<String> {
        self.ports.lock().unwrap().get(&handle).cloned()
    }

    /// Deletes the mapping if present. Removing an untracked handle is a
    /// no-op, so double closes and unknown handles are harmless.
    pub fn remove(&self, handle: RawHandle) -> bool {
        self.ports.lock().unwrap().remove(&handle).is_some()
    }

    pub fn tracked_count(&self) -> usize {
        self.ports.lock().unwrap().len()
    }
}
