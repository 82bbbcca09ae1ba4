//! Per-result mutual exclusion: at most one grading run per attempt at a time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::errors::AppError;

#[derive(Clone, Default)]
pub struct GradingLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of one grading run; releases the result on drop.
pub struct GradingGuard {
    _guard: OwnedMutexGuard<()>,
}

impl GradingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `result_id` without waiting. A run already in progress yields `Conflict`.
    pub fn try_acquire(&self, result_id: i64) -> Result<GradingGuard, AppError> {
        let lock = {
            let mut map = self
                .inner
                .lock()
                .map_err(|_| AppError::Internal(anyhow::anyhow!("grading lock map poisoned")))?;
            // Unheld entries have no outstanding guard clone.
            map.retain(|_, l| Arc::strong_count(l) > 1);
            map.entry(result_id).or_default().clone()
        };

        lock.try_lock_owned()
            .map(|guard| GradingGuard { _guard: guard })
            .map_err(|_| {
                AppError::Conflict(format!("Result {result_id} is already being graded"))
            })
    }
}
