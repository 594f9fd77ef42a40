//! Set of configurations with a cycle in flight.

use std::sync::Arc;

use dashmap::DashSet;

/// Concurrency-safe set of configuration identifiers.
///
/// An identifier stays in the set from the start of its cycle until the
/// end of its refresh delay.
#[derive(Clone, Default)]
pub struct RunningCycles {
    ids: Arc<DashSet<i64>>,
}

impl RunningCycles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an identifier. `None` if a cycle for it is already running.
    pub fn try_acquire(&self, id: i64) -> Option<CycleGuard> {
        if self.ids.insert(id) {
            Some(CycleGuard {
                ids: self.ids.clone(),
                id,
            })
        } else {
            None
        }
    }

    pub fn is_running(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Releases its identifier when dropped.
pub struct CycleGuard {
    ids: Arc<DashSet<i64>>,
    id: i64,
}

impl CycleGuard {
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.ids.remove(&self.id);
    }
}
