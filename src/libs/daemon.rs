//! Background reminder worker.
//!
//! `taskbell watch` re-launches the current executable with the hidden
//! `daemon-run` subcommand in a detached session and records its PID. The
//! worker runs the [`ReminderScheduler`] until SIGTERM/SIGINT (Ctrl+C on
//! Windows), lets the in-flight sweep finish, then removes the PID file.

use crate::db::db::Db;
use crate::db::tasks::Tasks;
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::mailer::Mailer;
use crate::libs::messages::Message;
use crate::libs::reminder::{DispatchSettings, Dispatcher, ReminderScheduler};
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const PID_FILE: &str = "taskbell-watch.pid";

pub fn pid_file_path() -> Result<PathBuf> {
    DataStorage::new().get_path(PID_FILE)
}

pub fn read_pid(path: &Path) -> Result<u32> {
    let pid_str = std::fs::read_to_string(path)?;
    pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))
}

/// Runs the reminder scheduler against `db_path` until a shutdown signal.
pub async fn run_with_signal_handling(db_path: &Path, config: &Config) -> Result<()> {
    let reminder = config.reminder_or_default();
    let mailer = Mailer::from_config(&config.mail_or_default())?;
    let tasks = Tasks::with_db(Db::open(db_path)?);
    let dispatcher = Arc::new(Dispatcher::new(tasks, mailer, DispatchSettings::from(&reminder)));

    let mut handle = ReminderScheduler::start(dispatcher, Arc::new(SystemClock), reminder.interval());

    wait_for_shutdown().await;
    msg_info!(Message::WorkerShuttingDown);
    handle.stop().await;

    let pid_path = pid_file_path()?;
    if pid_path.exists() && read_pid(&pid_path).ok() == Some(std::process::id()) {
        let _ = std::fs::remove_file(&pid_path);
    }
    msg_info!(Message::WorkerExitedNormally);

    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            msg_error!(Message::FailedToCreateSignalHandler(e.to_string()));
            std::future::pending::<()>().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
        _ = sigint.recv() => msg_info!(Message::WatcherReceivedSigint),
    }
}

#[cfg(windows)]
async fn wait_for_shutdown() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
        Err(e) => {
            msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(any(unix, windows)))]
async fn wait_for_shutdown() {
    msg_warning!(Message::WatcherSignalHandlingNotSupported);
    std::future::pending::<()>().await;
}

/// Starts the worker as a detached process, replacing a running one.
pub fn spawn(db_path: &Path) -> Result<()> {
    let pid_path = pid_file_path()?;

    if pid_path.exists() {
        if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
            msg_info!(Message::WatcherStoppingExisting(pid_str.trim().to_string()));
            if let Err(e) = stop_internal() {
                msg_warning!(Message::WatcherFailedToStopExisting(e.to_string()));
                let _ = std::fs::remove_file(&pid_path);
            }
        }
    }

    let current_exe = std::env::current_exe().map_err(|e| msg_error_anyhow!(Message::FailedToGetCurrentExecutable(e.to_string())))?;
    let mut command = std::process::Command::new(current_exe);
    command.arg("--db").arg(db_path).arg("daemon-run");

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_bail_anyhow!(Message::DaemonModeNotSupported);
    }

    let child = command.spawn()?;
    let pid = child.id();
    std::fs::write(pid_path, pid.to_string())?;
    msg_info!(Message::WatcherStarted(pid));

    Ok(())
}

/// Stops the background worker; not running is not an error.
pub fn stop() -> Result<()> {
    if !pid_file_path()?.exists() {
        msg_info!(Message::WatcherNotRunning);
        return Ok(());
    }
    stop_internal()
}

fn stop_internal() -> Result<()> {
    let pid_path = pid_file_path()?;
    if !pid_path.exists() {
        msg_bail_anyhow!(Message::WatcherNotRunningPidNotFound);
    }

    let pid = read_pid(&pid_path)?;
    let killed = kill_process(pid)?;
    if pid_path.exists() {
        std::fs::remove_file(&pid_path)?;
    }

    if killed {
        msg_info!(Message::WatcherStopped(pid));
    } else {
        msg_info!(Message::WatcherNotRunning);
    }
    Ok(())
}

/// Time the worker gets after SIGTERM. On shutdown it finishes only the
/// task in flight, so one relay request plus some slack is enough.
#[cfg(unix)]
const GRACE_PERIOD: Duration = Duration::from_secs(crate::libs::mailer::HTTP_TIMEOUT.as_secs() + 10);

#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(pid as i32);
    if kill(pid, None).is_err() {
        return Ok(false);
    }

    kill(pid, Signal::SIGTERM)?;

    let step = Duration::from_millis(100);
    let mut waited = Duration::ZERO;
    while waited < GRACE_PERIOD {
        std::thread::sleep(step);
        waited += step;
        if kill(pid, None).is_err() {
            return Ok(true);
        }
    }

    if let Err(e) = kill(pid, Signal::SIGKILL) {
        msg_warning!(Message::WatcherFailedToStop(pid.as_raw() as u32));
        return Err(e.into());
    }
    Ok(true)
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    // ERROR_INVALID_PARAMETER: no such process.
    const NO_SUCH_PROCESS: u32 = 87;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            if error == NO_SUCH_PROCESS {
                return Ok(false);
            }
            msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if result == 0 {
            msg_bail_anyhow!(Message::FailedToTerminateProcess(GetLastError()));
        }
        std::thread::sleep(Duration::from_millis(100));
        Ok(true)
    }
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}
