//! Core library modules for taskbell.
//!
//! - **Infrastructure**: configuration, data storage, clock, messages
//! - **Domain**: tasks, statistics
//! - **Reminders**: eligibility, dispatch, scheduling, mail delivery
//! - **Presentation**: console tables and date formatting
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use taskbell::db::{db::Db, tasks::Tasks};
//! use taskbell::libs::task::NewTask;
//!
//! let tasks = Tasks::with_db(Db::new()?);
//! let task = tasks.insert(1, &NewTask::new("Renew passport"), Utc::now())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod clock;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod formatter;
pub mod mail;
pub mod mailer;
pub mod messages;
pub mod notifier;
pub mod reminder;
pub mod stats;
pub mod task;
pub mod view;
