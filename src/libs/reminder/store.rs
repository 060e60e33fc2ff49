use crate::libs::task::Task;
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("task #{0} has no owner with an email address")]
    OwnerMissing(i64),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for ReminderError {
    fn from(e: rusqlite::Error) -> Self {
        ReminderError::Store(e.into())
    }
}

/// What the reminder core needs from persistent storage.
///
/// Implementations must make [`compare_and_set_reminded`](TaskStore::compare_and_set_reminded)
/// a single conditional write so that two overlapping sweeps can never both
/// claim the same task.
pub trait TaskStore: Send + Sync {
    /// Tasks with a due date at or before `now` that are neither completed nor
    /// reminded, across all owners. `task_id` narrows the query to one task;
    /// a missing task yields an empty result.
    fn find_eligible(&self, now: DateTime<Utc>, task_id: Option<i64>) -> Result<Vec<Task>, ReminderError>;

    /// Flips `is_reminded` to true if it is still false, the task is still
    /// open and its due date is still `due_date`. Returns whether this call
    /// performed the flip.
    fn compare_and_set_reminded(&self, task_id: i64, due_date: &DateTime<Utc>, now: DateTime<Utc>) -> Result<bool, ReminderError>;

    /// Undoes a claim so the next sweep picks the task up again. A no-op when
    /// the due date moved in the meantime.
    fn release_reminded(&self, task_id: i64, due_date: &DateTime<Utc>, now: DateTime<Utc>) -> Result<bool, ReminderError>;

    /// Email address of the task's owner.
    fn recipient_for(&self, task: &Task) -> Result<String, ReminderError>;
}
