//! Per-request mutual exclusion.
//!
//! Every status transition for a given request (accept, decline, submit,
//! cancel) runs under that request's lock, so the check-then-commit sequence
//! of an accept can never interleave with a competing accept of a different
//! offer on the same request. Reads never take these locks.
//!
//! Entries live as long as the request does. Requests are never deleted, so
//! the table grows with the registry — removing entries while a waiter holds
//! a handle would let a second lock appear for the same request.

use std::collections::HashMap;
use std::sync::Arc;

use openswap_types::RequestId;
use parking_lot::Mutex;

/// Keyed lock table: one mutex per request.
pub struct RequestLockTable {
    locks: Mutex<HashMap<RequestId, Arc<Mutex<()>>>>,
}

impl RequestLockTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get the lock handle for a request, creating it on first use.
    ///
    /// Callers lock the handle for the duration of the critical section:
    ///
    /// ```ignore
    /// let lock = table.handle(request_id);
    /// let _guard = lock.lock();
    /// // check-then-commit ...
    /// ```
    #[must_use]
    pub fn handle(&self, request_id: RequestId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .lock()
                .entry(request_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Number of requests ever locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

impl Default for RequestLockTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_request_same_lock() {
        let table = RequestLockTable::new();
        let id = RequestId::new();
        let a = table.handle(id);
        let b = table.handle(id);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn different_requests_different_locks() {
        let table = RequestLockTable::new();
        let a = table.handle(RequestId::new());
        let b = table.handle(RequestId::new());
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn handle_serializes_critical_sections() {
        let table = RequestLockTable::new();
        let id = RequestId::new();

        let lock = table.handle(id);
        let guard = lock.lock();

        // A second handle to the same request cannot enter while held.
        let other = table.handle(id);
        assert!(other.try_lock().is_none());

        drop(guard);
        assert!(other.try_lock().is_some());
    }

    #[test]
    fn disjoint_requests_do_not_block() {
        let table = RequestLockTable::new();
        let lock_a = table.handle(RequestId::new());
        let lock_b = table.handle(RequestId::new());

        let _guard_a = lock_a.lock();
        assert!(lock_b.try_lock().is_some());
    }
}
