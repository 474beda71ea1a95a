use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

/// One-second interview clock
///
/// The ticking task is owned by the timer and aborted on `stop`, `reset`
/// and drop. Elapsed seconds are published on a watch channel so the view
/// can redraw without polling.
pub struct SessionTimer {
    elapsed_tx: Arc<watch::Sender<u64>>,
    task: Option<JoinHandle<()>>,
}

impl SessionTimer {
    pub fn new() -> Self {
        let (elapsed_tx, _) = watch::channel(0);
        Self {
            elapsed_tx: Arc::new(elapsed_tx),
            task: None,
        }
    }

    /// Begin ticking from the current value; no-op if already running
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let elapsed_tx = Arc::clone(&self.elapsed_tx);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                elapsed_tx.send_modify(|secs| *secs += 1);
            }
        }));
        debug!("Session timer started at {}s", self.elapsed_secs());
    }

    /// Freeze the clock at its current value
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Session timer stopped at {}s", self.elapsed_secs());
        }
    }

    /// Stop and return to zero
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed_tx.send_replace(0);
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    pub fn elapsed_secs(&self) -> u64 {
        *self.elapsed_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.elapsed_tx.subscribe()
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// `MM:SS`, zero-padded; minutes keep counting past 59
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
