use super::dispatcher::Dispatcher;
use super::store::TaskStore;
use crate::libs::clock::Clock;
use crate::libs::mailer::MailTransport;
use crate::libs::messages::Message;
use crate::{msg_error, msg_info, msg_warning};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// `tokio::time::interval` rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Runs periodic batch sweeps on the tokio runtime.
pub struct ReminderScheduler;

impl ReminderScheduler {
    /// Spawns the sweep loop. The first sweep runs immediately, the next ones
    /// every `interval`. A sweep that overruns delays the following tick
    /// instead of queueing a burst. Stopping interrupts a running sweep
    /// between two tasks.
    pub fn start<S, M, C>(dispatcher: Arc<Dispatcher<S, M>>, clock: Arc<C>, interval: Duration) -> SchedulerHandle
    where
        S: TaskStore + 'static,
        M: MailTransport + 'static,
        C: Clock + ?Sized + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let sweeps = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&sweeps);
        let stopping = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stopping);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while !stop_flag.load(Ordering::SeqCst) {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let report = dispatcher.run_batch_until(clock.now(), &stop_flag).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        report.log();
                    }
                }
            }
        });

        msg_info!(Message::SchedulerStarted(interval.as_secs()));

        SchedulerHandle {
            shutdown: Some(shutdown_tx),
            join: Some(join),
            sweeps,
            stopping,
        }
    }
}

pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
    sweeps: Arc<AtomicU64>,
    stopping: Arc<AtomicBool>,
}

impl SchedulerHandle {
    /// Sweeps completed so far.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|join| !join.is_finished())
    }

    /// Signals the loop, waits for the task in flight to settle, and returns
    /// the number of sweeps performed. Tasks the interrupted sweep did not
    /// reach are left armed.
    pub async fn stop(&mut self) -> u64 {
        let (Some(shutdown), Some(join)) = (self.shutdown.take(), self.join.take()) else {
            msg_warning!(Message::SchedulerAlreadyStopped);
            return self.sweeps();
        };

        self.stopping.store(true, Ordering::SeqCst);
        // The loop may already be gone, in which case there is nobody to tell.
        let _ = shutdown.send(());
        if let Err(e) = join.await {
            msg_error!(Message::WorkerTaskPanicked(e.to_string()));
        }

        let sweeps = self.sweeps();
        msg_info!(Message::SchedulerStopped(sweeps));
        sweeps
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stopping.store(true, Ordering::SeqCst);
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
