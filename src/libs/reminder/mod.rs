//! Reminder eligibility and delivery.
//!
//! - [`evaluator`] decides which tasks are due for a reminder.
//! - [`dispatcher`] claims, mails and settles them one by one.
//! - [`scheduler`] drives batch sweeps on a fixed interval.
//! - [`store`] is the storage contract, implemented by `db::tasks::Tasks`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskbell::db::{db::Db, tasks::Tasks};
//! use taskbell::libs::clock::SystemClock;
//! use taskbell::libs::mailer::LogMailer;
//! use taskbell::libs::reminder::{DispatchSettings, Dispatcher, ReminderScheduler};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let tasks = Tasks::with_db(Db::new()?);
//! let dispatcher = Arc::new(Dispatcher::new(tasks, LogMailer, DispatchSettings::default()));
//! let mut handle = ReminderScheduler::start(dispatcher, Arc::new(SystemClock), std::time::Duration::from_secs(300));
//! handle.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod evaluator;
pub mod scheduler;
pub mod store;

pub use dispatcher::{DispatchSettings, Dispatcher, ReminderOutcome, SweepReport};
pub use evaluator::{is_eligible, Scope};
pub use scheduler::{ReminderScheduler, SchedulerHandle};
pub use store::{ReminderError, TaskStore};
