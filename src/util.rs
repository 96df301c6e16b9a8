use std::sync::{Mutex, MutexGuard, PoisonError};

/// A `RefCell` lookalike that can be shared across threads.
///
/// Borrows are never held across an `.await` or a user callback,
/// so contention is limited to the length of a field access.
#[derive(Debug, Default)]
pub struct SyncCell<T> {
    value: Mutex<T>,
}

impl<T> SyncCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    pub fn borrow_mut(&self) -> MutexGuard<'_, T> {
        // a panic while borrowed cannot leave the value half-written:
        // every borrow is a single read, clone, or replace
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
