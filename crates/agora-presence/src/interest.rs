//! Reference counting of which users the UI currently cares about.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Inner {
    counts: HashMap<String, usize>,
    /// Bumped by `clear()`; guards from an older epoch release nothing.
    epoch: u64,
}

/// Per-user interest counts. Cloning shares the same counts.
#[derive(Clone, Default)]
pub struct InterestRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl InterestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more observer of `user_id`.
    pub fn acquire(&self, user_id: &str) -> Interest {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *inner.counts.entry(user_id.to_string()).or_insert(0) += 1;
        Interest {
            user_id: user_id.to_string(),
            epoch: inner.epoch,
            registry: Some(self.clone()),
        }
    }

    pub fn count(&self, user_id: &str) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .get(user_id)
            .copied()
            .unwrap_or(0)
    }

    /// Users with at least one live interest.
    pub fn tracked(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every count. Outstanding guards become no-ops.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.counts.clear();
        inner.epoch += 1;
    }

    fn release(&self, user_id: &str, epoch: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.epoch != epoch {
            return;
        }
        if let Some(count) = inner.counts.get_mut(user_id) {
            *count -= 1;
            if *count == 0 {
                inner.counts.remove(user_id);
            }
        }
    }
}

/// One observer's interest in one user. Releasing (or dropping) it
/// decrements the count exactly once.
#[must_use = "dropping an Interest releases it immediately"]
pub struct Interest {
    user_id: String,
    epoch: u64,
    registry: Option<InterestRegistry>,
}

impl Interest {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(registry) = self.registry.take() {
            registry.release(&self.user_id, self.epoch);
        }
    }
}

impl Drop for Interest {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interest")
            .field("user_id", &self.user_id)
            .field("released", &self.registry.is_none())
            .finish()
    }
}
