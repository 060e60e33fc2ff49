//! Display implementation for taskbell messages.
//!
//! Keeps all user-facing wording in one place. Mail subjects are part of the
//! catalogue too, so the reminder and notification emails share the same
//! vocabulary as the terminal output.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task #{} created successfully", id),
            Message::TaskUpdated(id) => format!("Task #{} updated successfully", id),
            Message::TaskDeleted(id) => format!("Task #{} deleted successfully", id),
            Message::TaskCompleted(id) => format!("Task #{} marked as completed", id),
            Message::TaskReopened(id) => format!("Task #{} reopened", id),
            Message::TaskNotFound(id) => format!("Task with ID {} not found", id),
            Message::TaskTitleRequired => "Task title is required".to_string(),
            Message::TaskTitleTooLong(max) => format!("Task title must be at most {} characters", max),
            Message::TasksNotFound => "No tasks found".to_string(),
            Message::TasksHeader(username) => format!("Tasks of {}", username),
            Message::TaskDetailsHeader(id) => format!("Task #{}", id),
            Message::NoChangesDetected => "No changes detected.".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Are you sure you want to delete task '{}'?", title),
            Message::InvalidDueDate(input) => format!(
                "Invalid due date '{}'. Use YYYY-MM-DD, YYYY-MM-DDTHH:MM, 'YYYY-MM-DD HH:MM' or RFC 3339",
                input
            ),
            Message::DueDateNone => "None".to_string(),

            // === CATEGORY MESSAGES ===
            Message::CategoryCreated(id) => format!("Category #{} created successfully", id),
            Message::CategoryUpdated(id) => format!("Category #{} updated successfully", id),
            Message::CategoryDeleted(id) => format!("Category #{} deleted, its tasks are now uncategorized", id),
            Message::CategoryNotFound(id) => format!("Category with ID {} not found", id),
            Message::CategoryNameRequired => "Category name is required".to_string(),
            Message::CategoryNameTooLong(max) => format!("Category name must be at most {} characters", max),
            Message::CategoriesNotFound => "No categories found".to_string(),
            Message::CategoriesHeader(username) => format!("Categories of {}", username),
            Message::ConfirmDeleteCategory(name) => format!("Delete category '{}'? Its tasks will be kept.", name),

            // === USER MESSAGES ===
            Message::UserCreated(username) => format!("User '{}' created", username),
            Message::UserDeleted(username) => format!("User '{}' deleted together with their tasks and categories", username),
            Message::UserNotFound(username) => format!("User '{}' not found", username),
            Message::UserAlreadyExists(username) => format!("User '{}' already exists", username),
            Message::UsersNotFound => "No users found".to_string(),
            Message::UsersHeader => "Users".to_string(),
            Message::NoActiveUser => "No user selected. Pass --user, set TASKBELL_USER or run 'taskbell init'".to_string(),
            Message::InvalidEmail(email) => format!("'{}' is not a valid email address", email),
            Message::ConfirmDeleteUser(username) => format!("Delete user '{}' and everything they own?", username),

            // === DASHBOARD MESSAGES ===
            Message::StatsHeader(username) => format!("Dashboard of {}", username),
            Message::StatsRecentHeader => "Recent tasks".to_string(),
            Message::StatsCategoriesHeader => "Open tasks by category".to_string(),

            // === MAIL MESSAGES ===
            Message::MailSubjectReminder => "Task reminder".to_string(),
            Message::MailSubjectTaskCreated => "Task created".to_string(),
            Message::MailSubjectTaskUpdated => "Task updated".to_string(),
            Message::MailSubjectTaskDeleted => "Task deleted".to_string(),
            Message::MailLogged { to, subject } => format!("Mail to {} logged (no relay configured): {}", to, subject),
            Message::MailApiUrlMissing => "Mail transport 'http' needs an api_url in the mail configuration".to_string(),
            Message::NotificationFailed { to, error } => format!("Could not notify {}: {}", to, error),

            // === REMINDER MESSAGES ===
            Message::ReminderSent { task_id, to } => format!("Reminder for task #{} sent to {}", task_id, to),
            Message::ReminderDeliveryFailed { task_id, error } => format!("Reminder for task #{} was not delivered: {}", task_id, error),
            Message::ReminderReleased(task_id) => format!("Task #{} re-armed, delivery will be retried on the next sweep", task_id),
            Message::ReminderReleaseFailed { task_id, error } => format!("Could not re-arm task #{}: {}", task_id, error),
            Message::ReminderClaimedElsewhere(task_id) => format!("Task #{} was already reminded by another run", task_id),
            Message::ReminderSkipped { task_id, reason } => format!("Task #{} skipped: {}", task_id, reason),
            Message::ReminderSelectionFailed(error) => format!("Could not select tasks for reminders: {}", error),
            Message::ReminderSweepDeadline { processed, deferred } => {
                format!("Sweep deadline reached after {} task(s), {} deferred to the next sweep", processed, deferred)
            }
            Message::ReminderSweepInterrupted { processed, deferred } => {
                format!("Shutdown requested after {} task(s), {} left for the next run", processed, deferred)
            }
            Message::SweepCompleted { selected, sent, failed, skipped } => format!(
                "Reminder sweep finished: {} selected, {} sent, {} failed, {} skipped",
                selected, sent, failed, skipped
            ),
            Message::SweepNothingToDo => "No tasks need a reminder right now".to_string(),
            Message::SchedulerStarted(interval) => format!("Reminder scheduler started, sweeping every {} second(s)", interval),
            Message::SchedulerStopped(sweeps) => format!("Reminder scheduler stopped after {} sweep(s)", sweeps),
            Message::SchedulerAlreadyStopped => "Reminder scheduler had already stopped".to_string(),

            // === WATCHER/DAEMON MESSAGES ===
            Message::WatcherStarted(pid) => format!("Reminder worker started in the background with PID: {}", pid),
            Message::WatcherStopped(pid) => format!("Reminder worker with PID {} stopped", pid),
            Message::WatcherNotRunning => "Reminder worker is not running".to_string(),
            Message::WatcherNotRunningPidNotFound => "Reminder worker is not running (PID file not found)".to_string(),
            Message::WatcherStartingForeground => "Starting reminder worker in the foreground. Press Ctrl+C to stop.".to_string(),
            Message::WatcherStoppingExisting(pid) => format!("Stopping existing reminder worker (PID: {})", pid),
            Message::WatcherFailedToStopExisting(error) => format!("Failed to stop existing reminder worker: {}", error),
            Message::WatcherFailedToStop(pid) => format!("Failed to stop reminder worker with PID {}", pid),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Unable to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::WorkerExitedNormally => "Reminder worker exited normally".to_string(),
            Message::WorkerShuttingDown => "Reminder worker shutting down".to_string(),
            Message::WorkerTaskPanicked(error) => format!("Reminder worker task panicked: {}", error),
            Message::DaemonModeNotSupported => "Background mode is not supported on this platform".to_string(),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process, OS error {}", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process, OS error {}", code),
            Message::FailedToGetCurrentExecutable(error) => format!("Failed to locate the current executable: {}", error),
            Message::FailedToCreateSignalHandler(error) => format!("Failed to install signal handler: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigDeleted(path) => format!("Removed {}", path),
            Message::ConfigMissing(path) => format!("No configuration at {}, nothing to remove", path),
            Message::ConfigModuleReminder => "Reminder settings".to_string(),
            Message::ConfigModuleMail => "Mail transport settings".to_string(),
            Message::ConfigModuleUser => "Default user".to_string(),
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptReminderInterval => "Sweep interval (seconds)".to_string(),
            Message::PromptRetryOnFailure => "Retry reminders whose email failed on the next sweep?".to_string(),
            Message::PromptSweepTimeout => "Sweep time limit in seconds (0 for none)".to_string(),
            Message::PromptDescriptionPreview => "Characters of the description quoted in emails".to_string(),
            Message::PromptMailTransport => "Mail transport".to_string(),
            Message::PromptMailApiUrl => "Mail relay API URL".to_string(),
            Message::PromptMailApiToken => "Mail relay API token (leave empty to use TASKBELL_MAIL_TOKEN)".to_string(),
            Message::PromptMailFromAddress => "Sender address".to_string(),
            Message::PromptDefaultUser => "Default username".to_string(),

            // === DATABASE MESSAGES ===
            Message::MigrationApplying { version, name } => format!("Applying migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Database schema is at version {}", version),
            Message::MigrationFailed { version, error } => format!("Migration v{} failed: {}", version, error),
            Message::DbVersionAhead { current, latest } => format!(
                "Database schema version {} is newer than this build supports ({})",
                current, latest
            ),
        };
        write!(f, "{}", text)
    }
}
