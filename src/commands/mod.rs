//! Command-line interface.
//!
//! Every subcommand receives a [`Context`] carrying the database path, the
//! loaded configuration, the acting user and the clock, so handlers can be
//! driven from tests against a temporary database.

pub mod category;
pub mod init;
pub mod remind;
pub mod stats;
pub mod task;
pub mod user;
pub mod watch;

use crate::db::categories::Categories;
use crate::db::db::Db;
use crate::db::tasks::Tasks;
use crate::db::users::{User, Users};
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::{Config, ReminderConfig};
use crate::libs::daemon;
use crate::libs::mailer::Mailer;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage users")]
    User(user::UserArgs),
    #[command(about = "Manage tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage categories")]
    Category(category::CategoryArgs),
    #[command(about = "Show task statistics")]
    Stats,
    #[command(about = "Send due reminders now")]
    Remind(remind::RemindArgs),
    #[command(about = "Start or stop the background reminder worker")]
    Watch(watch::WatchArgs),
    #[command(hide = true)]
    DaemonRun,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Database file, defaults to taskbell.db in the data directory
    #[arg(long, global = true, env = "TASKBELL_DB")]
    db: Option<PathBuf>,

    /// Acting user, defaults to the configured user
    #[arg(short, long, global = true, env = "TASKBELL_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();

        if let Commands::Init(args) = cli.command {
            return init::cmd(args);
        }

        let db_path = match cli.db {
            Some(path) => path,
            None => Db::default_path()?,
        };
        let ctx = Context::new(db_path, Config::read()?, cli.user);

        match cli.command {
            Commands::Init(_) => Ok(()),
            Commands::User(args) => user::cmd(args, &ctx),
            Commands::Task(args) => task::cmd(args, &ctx).await,
            Commands::Category(args) => category::cmd(args, &ctx),
            Commands::Stats => stats::cmd(&ctx),
            Commands::Remind(args) => remind::cmd(args, &ctx).await,
            Commands::Watch(args) => watch::cmd(args, &ctx).await,
            Commands::DaemonRun => daemon::run_with_signal_handling(&ctx.db_path, &ctx.config).await,
        }
    }
}

/// Everything a command handler needs from the outside world.
pub struct Context {
    pub db_path: PathBuf,
    pub config: Config,
    username: Option<String>,
    clock: Arc<dyn Clock>,
}

impl Context {
    pub fn new(db_path: PathBuf, config: Config, username: Option<String>) -> Self {
        Self {
            db_path,
            config,
            username,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn tasks(&self) -> Result<Tasks> {
        Ok(Tasks::with_db(Db::open(&self.db_path)?))
    }

    pub fn categories(&self) -> Result<Categories> {
        Ok(Categories::with_db(Db::open(&self.db_path)?))
    }

    pub fn users(&self) -> Result<Users> {
        Ok(Users::with_db(Db::open(&self.db_path)?))
    }

    pub fn reminder(&self) -> ReminderConfig {
        self.config.reminder_or_default()
    }

    pub fn mailer(&self) -> Result<Mailer> {
        Ok(Mailer::from_config(&self.config.mail_or_default())?)
    }

    /// The user given with `--user`, or the configured default.
    pub fn current_user(&self) -> Result<User> {
        let username = self
            .username
            .as_deref()
            .or_else(|| self.config.default_username())
            .ok_or_else(|| msg_error_anyhow!(Message::NoActiveUser))?;

        self.users()?
            .get_by_username(username)?
            .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(username.to_string())))
    }
}
