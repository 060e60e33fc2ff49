//! Reminder eligibility.

use super::store::{ReminderError, TaskStore};
use crate::libs::task::Task;
use chrono::{DateTime, Utc};

/// Which tasks a sweep looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every owner's tasks.
    All,
    /// One task, used right after it was created with a due date.
    Task(i64),
}

impl Scope {
    fn task_id(self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::Task(id) => Some(id),
        }
    }
}

/// A task is eligible once its due date has passed, as long as it is still
/// open and has not been reminded for that due date.
pub fn is_eligible(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) => due <= now && !task.is_completed && !task.is_reminded,
        None => false,
    }
}

/// Eligible tasks for `scope` at `now`, in no guaranteed order.
///
/// The store's filter is re-checked here so a store that over-selects can
/// never cause a send.
pub fn select<S: TaskStore + ?Sized>(store: &S, now: DateTime<Utc>, scope: Scope) -> Result<Vec<Task>, ReminderError> {
    let mut tasks = store.find_eligible(now, scope.task_id())?;
    tasks.retain(|task| is_eligible(task, now));
    if let Scope::Task(id) = scope {
        tasks.retain(|task| task.id == id);
    }
    Ok(tasks)
}
