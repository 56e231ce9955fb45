use crate::error::AppError;
use crate::model::TaskStatus;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const INVALID_STATUS_REPLY: &str = "Invalid action or status.";

/// Per-user record of the task awaiting a status choice. One entry per user;
/// a new `begin_update` overwrites any earlier one, and entries never expire.
/// The mutex covers the whole read-modify-write so overlapping updates for
/// the same user cannot lose writes.
#[derive(Debug, Default)]
pub struct PendingUpdates {
    entries: Mutex<HashMap<i64, String>>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<i64, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Last write wins: a stale reply after a second `begin_update` resolves
    /// against the newer task name.
    pub fn begin_update(&self, user_id: i64, task_name: &str) {
        self.entries().insert(user_id, task_name.to_string());
    }

    /// Consumes the pending entry and returns the task name together with the
    /// chosen status. Fails without touching the entry when the user has
    /// nothing pending or the candidate is not one of the fixed labels.
    pub fn resolve_update(
        &self,
        user_id: i64,
        candidate: &str,
    ) -> Result<(String, TaskStatus), AppError> {
        let mut entries = self.entries();
        if !entries.contains_key(&user_id) {
            return Err(AppError::validation(INVALID_STATUS_REPLY));
        }
        let status =
            TaskStatus::from_label(candidate).ok_or_else(|| AppError::validation(INVALID_STATUS_REPLY))?;

        let task_name = entries
            .remove(&user_id)
            .ok_or_else(|| AppError::validation(INVALID_STATUS_REPLY))?;

        Ok((task_name, status))
    }

    pub fn pending_task(&self, user_id: i64) -> Option<String> {
        self.entries().get(&user_id).cloned()
    }
}
