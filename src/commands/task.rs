use super::Context;
use crate::libs::formatter::parse_due_date;
use crate::libs::mail::Mail;
use crate::libs::mailer::MailTransport;
use crate::libs::messages::Message;
use crate::libs::notifier::notify_owner;
use crate::libs::reminder::{DispatchSettings, Dispatcher};
use crate::libs::task::{NewTask, Priority, Task, TaskChanges, TaskOrder, TaskQuery};
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due date, e.g. "2024-05-01 18:00" (local time) or RFC 3339
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category ID
        #[arg(short, long)]
        category: Option<i64>,
    },
    /// Change a task; changing the due date re-arms its reminder
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<i64>,
        #[arg(long)]
        no_category: bool,
    },
    /// Mark a task as completed
    Done { id: i64 },
    /// Mark a completed task as open again
    Undone { id: i64 },
    /// Delete a task
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List tasks
    List {
        /// Match title or description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, value_enum, default_value_t = TaskOrder::Newest)]
        order: TaskOrder,
        /// Hide completed tasks
        #[arg(long)]
        pending: bool,
        /// Only tasks in this category
        #[arg(short, long)]
        category: Option<i64>,
    },
    /// Show one task
    Show { id: i64 },
}

pub async fn cmd(args: TaskArgs, ctx: &Context) -> Result<()> {
    match args.command {
        TaskCommand::Add {
            title,
            description,
            due,
            priority,
            category,
        } => {
            let new = NewTask {
                title,
                description,
                due_date: due.as_deref().map(parse_due_date).transpose()?,
                priority,
                category_id: category,
            };
            let mailer = ctx.mailer()?;
            create(ctx, &mailer, &new).await?;
            Ok(())
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            due,
            clear_due,
            priority,
            category,
            no_category,
        } => {
            let due_date = match (due, clear_due) {
                (_, true) => Some(None),
                (Some(due), false) => Some(Some(parse_due_date(&due)?)),
                (None, false) => None,
            };
            let category_id = match (category, no_category) {
                (_, true) => Some(None),
                (Some(category), false) => Some(Some(category)),
                (None, false) => None,
            };
            let changes = TaskChanges {
                title,
                description,
                due_date,
                priority,
                category_id,
            };
            if changes.is_empty() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }
            let mailer = ctx.mailer()?;
            edit(ctx, &mailer, id, &changes).await?;
            Ok(())
        }
        TaskCommand::Done { id } => set_completed(ctx, id, true).map(|_| ()),
        TaskCommand::Undone { id } => set_completed(ctx, id, false).map(|_| ()),
        TaskCommand::Delete { id, yes } => {
            let user = ctx.current_user()?;
            let Some(task) = ctx.tasks()?.get(user.id, id)? else {
                msg_bail_anyhow!(Message::TaskNotFound(id));
            };
            if !yes {
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteTask(task.title).to_string())
                    .default(false)
                    .interact()?;
                if !confirmed {
                    return Ok(());
                }
            }
            let mailer = ctx.mailer()?;
            delete(ctx, &mailer, id).await?;
            Ok(())
        }
        TaskCommand::List {
            search,
            order,
            pending,
            category,
        } => {
            let query = TaskQuery {
                search,
                order,
                pending_only: pending,
                category_id: category,
            };
            let user = ctx.current_user()?;
            let tasks = ctx.tasks()?.list(user.id, &query)?;
            if tasks.is_empty() {
                msg_info!(Message::TasksNotFound);
                return Ok(());
            }
            msg_print!(Message::TasksHeader(user.username), true);
            View::tasks(&tasks);
            Ok(())
        }
        TaskCommand::Show { id } => {
            let user = ctx.current_user()?;
            match ctx.tasks()?.get(user.id, id)? {
                Some(task) => {
                    msg_print!(Message::TaskDetailsHeader(task.id), true);
                    View::task(&task);
                    Ok(())
                }
                None => msg_bail_anyhow!(Message::TaskNotFound(id)),
            }
        }
    }
}

/// Creates a task for the acting user, confirms it by mail and, when the due
/// date has already passed, reminds right away.
pub async fn create<M: MailTransport>(ctx: &Context, mailer: &M, new: &NewTask) -> Result<Task> {
    let user = ctx.current_user()?;
    let tasks = ctx.tasks()?;
    let reminder = ctx.reminder();

    let task = tasks.insert(user.id, new, ctx.now())?;
    msg_success!(Message::TaskCreated(task.id));
    notify_owner(mailer, Mail::task_created(&task, &user.email, reminder.description_preview)).await;

    if task.due_date.is_some() {
        let dispatcher = Dispatcher::new(tasks, mailer, DispatchSettings::from(&reminder));
        dispatcher.run_single(task.id, ctx.now()).await.log();
    }

    Ok(task)
}

pub async fn edit<M: MailTransport>(ctx: &Context, mailer: &M, id: i64, changes: &TaskChanges) -> Result<Task> {
    let user = ctx.current_user()?;
    let task = ctx.tasks()?.update(user.id, id, changes, ctx.now())?;
    msg_success!(Message::TaskUpdated(task.id));
    notify_owner(mailer, Mail::task_updated(&task, &user.email, ctx.reminder().description_preview)).await;
    Ok(task)
}

pub async fn delete<M: MailTransport>(ctx: &Context, mailer: &M, id: i64) -> Result<Task> {
    let user = ctx.current_user()?;
    let task = ctx.tasks()?.delete(user.id, id)?;
    msg_success!(Message::TaskDeleted(task.id));
    notify_owner(mailer, Mail::task_deleted(&task, &user.email, ctx.reminder().description_preview)).await;
    Ok(task)
}

pub fn set_completed(ctx: &Context, id: i64, completed: bool) -> Result<Task> {
    let user = ctx.current_user()?;
    let task = ctx.tasks()?.set_completed(user.id, id, completed, ctx.now())?;
    if completed {
        msg_success!(Message::TaskCompleted(task.id));
    } else {
        msg_success!(Message::TaskReopened(task.id));
    }
    Ok(task)
}
