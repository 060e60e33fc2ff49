//! Sends reminders for eligible tasks.
//!
//! Each task goes through claim, send, settle:
//!
//! 1. the reminded flag is claimed with a compare-and-set on the store, so two
//!    overlapping sweeps can never both mail the same task;
//! 2. the reminder mail is handed to the transport;
//! 3. on delivery failure the claim is kept, or released when
//!    `retry_on_failure` is set so the next sweep tries again.
//!
//! Nothing that happens to one task stops the sweep from moving on to the
//! next, and nothing is propagated to the caller except the [`SweepReport`].

use super::evaluator::{select, Scope};
use super::store::TaskStore;
use crate::libs::config::ReminderConfig;
use crate::libs::mail::Mail;
use crate::libs::mailer::{DeliveryError, MailTransport};
use crate::libs::messages::Message;
use crate::libs::task::Task;
use crate::{msg_debug, msg_error, msg_info, msg_success, msg_warning};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub retry_on_failure: bool,
    pub description_preview: usize,
    /// Checked between tasks only; a task that was started is always finished.
    pub sweep_timeout: Option<Duration>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&ReminderConfig::default())
    }
}

impl From<&ReminderConfig> for DispatchSettings {
    fn from(config: &ReminderConfig) -> Self {
        Self {
            retry_on_failure: config.retry_on_failure,
            description_preview: config.description_preview,
            sweep_timeout: config.sweep_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    Sent,
    /// The transport failed. `released` tells whether the task was re-armed.
    DeliveryFailed { error: DeliveryError, released: bool },
    /// Another trigger reminded the task first, or it stopped qualifying.
    ClaimedElsewhere,
    /// The task could not be processed (owner missing, store error).
    Skipped { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub selected: usize,
    pub outcomes: Vec<(i64, ReminderOutcome)>,
    /// Set when the eligible tasks could not be queried at all.
    pub selection_error: Option<String>,
    /// Selected tasks left for the next sweep because the timeout hit.
    pub deferred: usize,
}

impl SweepReport {
    fn count(&self, predicate: impl Fn(&ReminderOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| predicate(outcome)).count()
    }

    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, ReminderOutcome::Sent))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReminderOutcome::DeliveryFailed { .. }))
    }

    pub fn released(&self) -> usize {
        self.count(|o| matches!(o, ReminderOutcome::DeliveryFailed { released: true, .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ReminderOutcome::Skipped { .. } | ReminderOutcome::ClaimedElsewhere))
    }

    pub fn outcome_for(&self, task_id: i64) -> Option<&ReminderOutcome> {
        self.outcomes.iter().find(|(id, _)| *id == task_id).map(|(_, outcome)| outcome)
    }

    pub fn is_empty(&self) -> bool {
        self.selected == 0 && self.selection_error.is_none()
    }

    /// One summary line for the operator.
    pub fn log(&self) {
        if self.is_empty() {
            msg_debug!(Message::SweepNothingToDo);
            return;
        }
        msg_info!(Message::SweepCompleted {
            selected: self.selected,
            sent: self.sent(),
            failed: self.failed(),
            skipped: self.skipped(),
        });
    }
}

pub struct Dispatcher<S, M> {
    store: S,
    mailer: M,
    settings: DispatchSettings,
}

impl<S: TaskStore, M: MailTransport> Dispatcher<S, M> {
    pub fn new(store: S, mailer: M, settings: DispatchSettings) -> Self {
        Self { store, mailer, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Reminds every eligible task of every owner.
    pub async fn run_batch(&self, now: DateTime<Utc>) -> SweepReport {
        self.sweep(now, Scope::All, None).await
    }

    /// Batch sweep that stops picking up tasks once `stop` is set. The task in
    /// flight is finished; the rest is reported as deferred.
    pub async fn run_batch_until(&self, now: DateTime<Utc>, stop: &AtomicBool) -> SweepReport {
        self.sweep(now, Scope::All, Some(stop)).await
    }

    /// Reminds one task if it is eligible; otherwise does nothing.
    pub async fn run_single(&self, task_id: i64, now: DateTime<Utc>) -> SweepReport {
        self.sweep(now, Scope::Task(task_id), None).await
    }

    async fn sweep(&self, now: DateTime<Utc>, scope: Scope, stop: Option<&AtomicBool>) -> SweepReport {
        let started = Instant::now();
        let mut report = SweepReport::default();

        let tasks = match select(&self.store, now, scope) {
            Ok(tasks) => tasks,
            Err(e) => {
                msg_error!(Message::ReminderSelectionFailed(e.to_string()));
                report.selection_error = Some(e.to_string());
                return report;
            }
        };
        report.selected = tasks.len();

        for (index, task) in tasks.iter().enumerate() {
            if stop.is_some_and(|stop| stop.load(Ordering::SeqCst)) {
                report.deferred = tasks.len() - index;
                msg_info!(Message::ReminderSweepInterrupted {
                    processed: index,
                    deferred: report.deferred,
                });
                break;
            }
            if let Some(limit) = self.settings.sweep_timeout {
                if started.elapsed() >= limit {
                    report.deferred = tasks.len() - index;
                    msg_warning!(Message::ReminderSweepDeadline {
                        processed: index,
                        deferred: report.deferred,
                    });
                    break;
                }
            }

            let outcome = self.process(task, now).await;
            tracing::debug!(task_id = task.id, outcome = ?outcome, "reminder processed");
            report.outcomes.push((task.id, outcome));
        }

        report
    }

    async fn process(&self, task: &Task, now: DateTime<Utc>) -> ReminderOutcome {
        let Some(due_date) = task.due_date else {
            return skipped(task.id, Message::DueDateNone.to_string());
        };

        let to = match self.store.recipient_for(task) {
            Ok(to) => to,
            Err(e) => return skipped(task.id, e.to_string()),
        };

        match self.store.compare_and_set_reminded(task.id, &due_date, now) {
            Ok(true) => {}
            Ok(false) => {
                msg_debug!(Message::ReminderClaimedElsewhere(task.id));
                return ReminderOutcome::ClaimedElsewhere;
            }
            Err(e) => return skipped(task.id, e.to_string()),
        }

        let mail = Mail::reminder(task, &to, self.settings.description_preview);
        match self.mailer.send(&mail).await {
            Ok(()) => {
                msg_success!(Message::ReminderSent { task_id: task.id, to });
                ReminderOutcome::Sent
            }
            Err(error) => {
                msg_warning!(Message::ReminderDeliveryFailed {
                    task_id: task.id,
                    error: error.to_string(),
                });
                let released = self.settings.retry_on_failure && self.release(task.id, &due_date, now);
                ReminderOutcome::DeliveryFailed { error, released }
            }
        }
    }

    fn release(&self, task_id: i64, due_date: &DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.store.release_reminded(task_id, due_date, now) {
            Ok(released) => {
                if released {
                    msg_info!(Message::ReminderReleased(task_id));
                }
                released
            }
            Err(e) => {
                msg_error!(Message::ReminderReleaseFailed {
                    task_id,
                    error: e.to_string(),
                });
                false
            }
        }
    }
}

fn skipped(task_id: i64, reason: String) -> ReminderOutcome {
    msg_warning!(Message::ReminderSkipped {
        task_id,
        reason: reason.clone(),
    });
    ReminderOutcome::Skipped { reason }
}
