//! # Taskbell
//!
//! A personal task manager: tasks with due dates, priorities and categories
//! kept in SQLite, and a background worker that emails each owner once when a
//! task becomes overdue.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskbell::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
