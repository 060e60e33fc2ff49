use crate::libs::formatter::{format_due_date, preview};
use crate::libs::messages::Message;
use crate::libs::task::Task;
use serde::Serialize;

/// An outgoing message, independent of how it is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn new(to: &str, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Reminder for a task whose due date has passed.
    pub fn reminder(task: &Task, to: &str, preview_len: usize) -> Self {
        let body = format!(
            "Reminder: your task \"{}\" is due or overdue.\nDescription: {}\nDue date: {}",
            task.title,
            preview(&task.description, preview_len),
            format_due_date(task.due_date.as_ref()),
        );
        Self::new(to, Message::MailSubjectReminder.to_string(), body)
    }

    pub fn task_created(task: &Task, to: &str, preview_len: usize) -> Self {
        Self::new(
            to,
            Message::MailSubjectTaskCreated.to_string(),
            format!("Your task \"{}\" was created.\n{}", task.title, summary(task, preview_len)),
        )
    }

    pub fn task_updated(task: &Task, to: &str, preview_len: usize) -> Self {
        Self::new(
            to,
            Message::MailSubjectTaskUpdated.to_string(),
            format!("Your task \"{}\" was updated.\n{}", task.title, summary(task, preview_len)),
        )
    }

    pub fn task_deleted(task: &Task, to: &str, preview_len: usize) -> Self {
        Self::new(
            to,
            Message::MailSubjectTaskDeleted.to_string(),
            format!("Your task \"{}\" was deleted.\n{}", task.title, summary(task, preview_len)),
        )
    }
}

fn summary(task: &Task, preview_len: usize) -> String {
    format!(
        "Description: {}\nDue date: {}",
        preview(&task.description, preview_len),
        format_due_date(task.due_date.as_ref())
    )
}
