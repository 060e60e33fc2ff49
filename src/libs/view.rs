use super::formatter::{format_due_date, format_timestamp, preview};
use super::reminder::{ReminderOutcome, SweepReport};
use super::stats::Dashboard;
use super::task::Task;
use crate::db::categories::Category;
use crate::db::users::User;
use prettytable::{row, Table};

const LIST_PREVIEW: usize = 40;

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "PRIORITY", "DUE", "CATEGORY", "DONE", "REMINDED"]);
        for task in tasks {
            table.add_row(row![
                task.id,
                preview(&task.title, LIST_PREVIEW),
                task.priority,
                format_due_date(task.due_date.as_ref()),
                task.category_name.as_deref().unwrap_or("-"),
                yes_no(task.is_completed),
                yes_no(task.is_reminded)
            ]);
        }
        table.printstd();
    }

    pub fn task(task: &Task) {
        let mut table = Table::new();

        table.add_row(row!["Title", task.title]);
        table.add_row(row!["Description", task.description]);
        table.add_row(row!["Priority", task.priority]);
        table.add_row(row!["Due", format_due_date(task.due_date.as_ref())]);
        table.add_row(row!["Category", task.category_name.as_deref().unwrap_or("-")]);
        table.add_row(row!["Completed", yes_no(task.is_completed)]);
        table.add_row(row!["Reminded", yes_no(task.is_reminded)]);
        table.add_row(row!["Created", format_timestamp(&task.created_at)]);
        table.add_row(row!["Updated", format_timestamp(&task.updated_at)]);
        table.printstd();
    }

    pub fn categories(categories: &[Category]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "DESCRIPTION", "CREATED"]);
        for category in categories {
            table.add_row(row![
                category.id,
                category.name,
                category.description.as_deref().unwrap_or(""),
                format_timestamp(&category.created_at)
            ]);
        }
        table.printstd();
    }

    pub fn users(users: &[User]) {
        let mut table = Table::new();

        table.add_row(row!["USERNAME", "EMAIL", "NAME", "CREATED"]);
        for user in users {
            table.add_row(row![
                user.username,
                user.email,
                user.name.as_deref().unwrap_or(""),
                format_timestamp(&user.created_at)
            ]);
        }
        table.printstd();
    }

    pub fn dashboard(dashboard: &Dashboard) {
        let mut table = Table::new();

        table.add_row(row!["Total", dashboard.total]);
        table.add_row(row!["Completed", dashboard.completed]);
        table.add_row(row!["Pending", dashboard.pending]);
        table.add_row(row!["Categories", dashboard.categories]);
        table.add_row(row!["Overdue", dashboard.overdue]);
        table.add_row(row!["Due within 7 days", dashboard.upcoming]);
        for (priority, count) in &dashboard.open_by_priority {
            table.add_row(row![format!("Open ({})", priority), count]);
        }
        table.printstd();
    }

    pub fn top_categories(categories: &[(String, usize)]) {
        let mut table = Table::new();

        table.add_row(row!["CATEGORY", "OPEN TASKS"]);
        for (name, count) in categories {
            table.add_row(row![name, count]);
        }
        table.printstd();
    }

    pub fn sweep(report: &SweepReport) {
        let mut table = Table::new();

        table.add_row(row!["TASK", "OUTCOME"]);
        for (task_id, outcome) in &report.outcomes {
            let outcome = match outcome {
                ReminderOutcome::Sent => "sent".to_string(),
                ReminderOutcome::DeliveryFailed { error, released: true } => format!("failed, will retry: {}", error),
                ReminderOutcome::DeliveryFailed { error, released: false } => format!("failed: {}", error),
                ReminderOutcome::ClaimedElsewhere => "already reminded".to_string(),
                ReminderOutcome::Skipped { reason } => format!("skipped: {}", reason),
            };
            table.add_row(row![task_id, outcome]);
        }
        table.printstd();
    }
}
