//! Per-identifier mutation lock.
//!
//! [`InFlight`] tracks which resource ids have a mutation outstanding. A
//! second mutation for the same id is rejected; mutations on different ids
//! run concurrently. The lock is released when the [`InFlightGuard`] drops,
//! including on early returns.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::ResourceId;

/// Set of identifiers with a mutation in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    ids: Arc<Mutex<HashSet<ResourceId>>>,
}

impl InFlight {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as busy. Returns `None` if it already is.
    #[must_use]
    pub fn try_acquire(&self, id: &ResourceId) -> Option<InFlightGuard> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        if ids.insert(id.clone()) {
            Some(InFlightGuard {
                ids: Arc::clone(&self.ids),
                id: id.clone(),
            })
        } else {
            None
        }
    }

    /// Returns `true` if `id` has a mutation in flight.
    #[must_use]
    pub fn is_busy(&self, id: &ResourceId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Number of ids currently busy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases the identifier on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<ResourceId>>>,
    id: ResourceId,
}

impl InFlightGuard {
    /// The locked identifier.
    #[must_use]
    pub const fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
