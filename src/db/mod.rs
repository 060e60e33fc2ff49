//! SQLite persistence.
//!
//! [`db::Db`] opens a connection, enables foreign keys and applies pending
//! [`migrations`]. The table modules wrap that connection:
//!
//! - [`users`]: task owners and their email addresses
//! - [`categories`]: per-user categories; deleting one clears it on its tasks
//! - [`tasks`]: per-user tasks, plus the reminder store used by the worker
//!
//! ```rust,no_run
//! use taskbell::db::{db::Db, users::Users};
//!
//! let mut users = Users::with_db(Db::open("taskbell.db")?);
//! users.create("ana", "ana@example.com", Some("Ana"), chrono::Utc::now())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod categories;
#[allow(clippy::module_inception)]
pub mod db;
pub mod migrations;
pub mod tasks;
pub mod users;
