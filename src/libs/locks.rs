//! Per-employee mutual exclusion for read-modify-write sequences.
//!
//! Clock actions and pattern writes for the same employee are serialized;
//! different employees never wait on each other beyond the short registry
//! lookup.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of one mutex per employee id.
///
/// Cloning shares the registry, so every handle guards the same employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock of `employee_id`.
    pub fn with_employee<T>(&self, employee_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = {
            let mut registry = self.inner.lock();
            registry.entry(employee_id.to_string()).or_default().clone()
        };
        let _guard = lock.lock();
        f()
    }

    /// Number of employees that have taken a lock so far.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
