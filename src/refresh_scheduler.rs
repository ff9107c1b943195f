// Periodic refresh of the relative dates shown in the status bar.
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Weak,
};

use log::{debug, error, info, trace};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::{Controller, NoteError, NoteView, Result, StorageMedium};

#[derive(Debug, Clone)]
pub struct RefreshSchedulerStatus {
    /// Whether the scheduler is running
    pub is_running: bool,
    /// How many refreshes have been performed
    pub refresh_count: u64,
}

#[derive(Debug, Clone)]
pub enum RefreshCommand {
    /// Refresh immediately, outside the regular schedule
    RefreshNow,
    /// Stop the scheduler
    Stop,
}

/// Background ticker that asks the controller to re-render the status bar.
/// It only ever reads state; nothing is persisted from here.
pub struct DateRefreshScheduler {
    interval: Duration,

    /// Channel to send commands to the scheduler task
    command_tx: Option<mpsc::Sender<RefreshCommand>>,

    /// Handle to the scheduler task
    task: Option<JoinHandle<()>>,

    refresh_count: Arc<AtomicU64>,
}

impl DateRefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            command_tx: None,
            task: None,
            refresh_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts ticking against `controller`. The scheduler holds only a weak
    /// reference and exits on its own once the controller is dropped.
    pub fn start<M, V>(&mut self, controller: &Arc<Mutex<Controller<M, V>>>) -> Result<()>
    where
        M: StorageMedium + 'static,
        V: NoteView + 'static,
    {
        if self.task.is_some() {
            debug!("Date refresh scheduler already running");
            return Ok(());
        }
        if self.interval.is_zero() {
            return Err(NoteError::Config {
                message: "date refresh interval must be greater than zero".to_string(),
            });
        }

        info!(
            "Starting date refresh scheduler every {}s",
            self.interval.as_secs_f64()
        );
        let (command_tx, mut command_rx) = mpsc::channel(10);
        self.command_tx = Some(command_tx);

        let weak: Weak<Mutex<Controller<M, V>>> = Arc::downgrade(controller);
        let refresh_count = Arc::clone(&self.refresh_count);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await; // Initial tick

            loop {
                let refresh = tokio::select! {
                    _ = interval.tick() => true,
                    cmd = command_rx.recv() => match cmd {
                        Some(RefreshCommand::RefreshNow) => true,
                        Some(RefreshCommand::Stop) | None => {
                            info!("Date refresh scheduler stopping...");
                            false
                        }
                    }
                };
                if !refresh {
                    break;
                }

                let Some(controller) = weak.upgrade() else {
                    debug!("Controller dropped, date refresh scheduler exiting");
                    break;
                };
                controller.lock().await.refresh_dates();
                refresh_count.fetch_add(1, Ordering::SeqCst);
                trace!("Relative dates refreshed");
            }
        });

        self.task = Some(task);
        Ok(())
    }

    /// Stop the scheduler if it's running
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            if let Some(tx) = self.command_tx.take() {
                if let Err(e) = tx.send(RefreshCommand::Stop).await {
                    debug!("Date refresh task already gone: {}", e);
                }
            }

            if let Err(e) = task.await {
                let error_msg = format!("Failed to stop date refresh scheduler: {}", e);
                error!("{}", error_msg);
                return Err(NoteError::Application { message: error_msg });
            }
            info!("Date refresh scheduler stopped");
        } else {
            debug!("Date refresh scheduler is not running");
        }

        Ok(())
    }

    /// Refresh immediately, regardless of the schedule
    pub async fn refresh_now(&self) -> Result<()> {
        let tx = self.command_tx.as_ref().ok_or_else(|| NoteError::Application {
            message: "Date refresh scheduler is not running".to_string(),
        })?;

        tx.send(RefreshCommand::RefreshNow)
            .await
            .map_err(|e| NoteError::Application {
                message: format!("Failed to send refresh command: {}", e),
            })
    }

    pub fn get_status(&self) -> RefreshSchedulerStatus {
        RefreshSchedulerStatus {
            is_running: self.task.as_ref().is_some_and(|t| !t.is_finished()),
            refresh_count: self.refresh_count.load(Ordering::SeqCst),
        }
    }
}
