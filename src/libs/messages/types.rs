//! Message catalogue for every user-visible string in taskbell.
//!
//! Variants are grouped by feature area. Parameters carry the dynamic parts
//! (identifiers, names, error text) and are interpolated by the `Display`
//! implementation in `display.rs`.

#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(i64),
    TaskUpdated(i64),
    TaskDeleted(i64),
    TaskCompleted(i64),
    TaskReopened(i64),
    TaskNotFound(i64),
    TaskTitleRequired,
    TaskTitleTooLong(usize), // max length
    TasksNotFound,
    TasksHeader(String), // username
    TaskDetailsHeader(i64),
    NoChangesDetected,
    ConfirmDeleteTask(String), // title
    InvalidDueDate(String),    // raw input
    DueDateNone,

    // === CATEGORY MESSAGES ===
    CategoryCreated(i64),
    CategoryUpdated(i64),
    CategoryDeleted(i64),
    CategoryNotFound(i64),
    CategoryNameRequired,
    CategoryNameTooLong(usize), // max length
    CategoriesNotFound,
    CategoriesHeader(String), // username
    ConfirmDeleteCategory(String),

    // === USER MESSAGES ===
    UserCreated(String),
    UserDeleted(String),
    UserNotFound(String),
    UserAlreadyExists(String),
    UsersNotFound,
    UsersHeader,
    NoActiveUser,
    InvalidEmail(String),
    ConfirmDeleteUser(String),

    // === DASHBOARD MESSAGES ===
    StatsHeader(String), // username
    StatsRecentHeader,
    StatsCategoriesHeader,

    // === MAIL MESSAGES ===
    MailSubjectReminder,
    MailSubjectTaskCreated,
    MailSubjectTaskUpdated,
    MailSubjectTaskDeleted,
    MailLogged {
        to: String,
        subject: String,
    },
    MailApiUrlMissing,
    NotificationFailed {
        to: String,
        error: String,
    },

    // === REMINDER MESSAGES ===
    ReminderSent {
        task_id: i64,
        to: String,
    },
    ReminderDeliveryFailed {
        task_id: i64,
        error: String,
    },
    ReminderReleased(i64),
    ReminderReleaseFailed {
        task_id: i64,
        error: String,
    },
    ReminderClaimedElsewhere(i64),
    ReminderSkipped {
        task_id: i64,
        reason: String,
    },
    ReminderSelectionFailed(String),
    ReminderSweepDeadline {
        processed: usize,
        deferred: usize,
    },
    ReminderSweepInterrupted {
        processed: usize,
        deferred: usize,
    },
    SweepCompleted {
        selected: usize,
        sent: usize,
        failed: usize,
        skipped: usize,
    },
    SweepNothingToDo,
    SchedulerStarted(u64), // interval seconds
    SchedulerStopped(u64), // sweeps performed
    SchedulerAlreadyStopped,

    // === WATCHER/DAEMON MESSAGES ===
    WatcherStarted(u32), // PID
    WatcherStopped(u32), // PID
    WatcherNotRunning,
    WatcherNotRunningPidNotFound,
    WatcherStartingForeground,
    WatcherStoppingExisting(String),     // PID
    WatcherFailedToStopExisting(String), // error
    WatcherFailedToStop(u32),            // PID
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String), // error
    WatcherSignalHandlingNotSupported,
    WorkerExitedNormally,
    WorkerShuttingDown,
    WorkerTaskPanicked(String),
    DaemonModeNotSupported,
    InvalidPidFileContent,
    ProcessTerminationNotSupported,
    FailedToOpenProcess(u32),      // OS error code
    FailedToTerminateProcess(u32), // OS error code
    FailedToGetCurrentExecutable(String),
    FailedToCreateSignalHandler(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String),   // path
    ConfigDeleted(String), // path
    ConfigMissing(String), // path
    ConfigModuleReminder,
    ConfigModuleMail,
    ConfigModuleUser,
    PromptSelectModules,
    PromptReminderInterval,
    PromptRetryOnFailure,
    PromptSweepTimeout,
    PromptDescriptionPreview,
    PromptMailTransport,
    PromptMailApiUrl,
    PromptMailApiToken,
    PromptMailFromAddress,
    PromptDefaultUser,

    // === DATABASE MESSAGES ===
    MigrationApplying {
        version: u32,
        name: String,
    },
    MigrationCompleted(u32),
    MigrationFailed {
        version: u32,
        error: String,
    },
    DbVersionAhead {
        current: u32,
        latest: u32,
    },
}
