//! Per-attribute serialization of link, unlink and write calls
//!
//! Calls touching the same attribute reference are serialized through a
//! per-reference mutex; calls on different references never contend beyond
//! the brief map lookup.

use crate::types::AttributeRef;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-reference lock manager
pub struct RefLockManager {
    /// Map from reference to its lock. Entries are pruned once unused.
    locks: RwLock<HashMap<AttributeRef, Arc<Mutex<()>>>>,
}

impl RefLockManager {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the lock for a reference
    pub fn get_lock(&self, attribute_ref: &AttributeRef) -> Arc<Mutex<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(attribute_ref) {
                return Arc::clone(lock);
            }
        }

        let mut map = self.locks.write();
        // Another thread may have created it between the two locks
        Arc::clone(
            map.entry(attribute_ref.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drop locks nobody else holds a handle to.
    pub fn prune(&self) {
        self.locks
            .write()
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }
}

impl Default for RefLockManager {
    fn default() -> Self {
        Self::new()
    }
}
