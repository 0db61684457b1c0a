//! Fixed-period tick source for a tracker.
//!
//! Each tracker gets its own `Ticker`; stopping or dropping it ends the task.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Send `message` on `tx` every `period`, first one a full period from now.
    /// The task ends on its own once the receiver is gone.
    pub fn start<E>(period: Duration, tx: mpsc::Sender<E>, message: E) -> Self
    where
        E: Clone + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(message.clone()).await.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "ticker started");
        Self {
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("ticker stopped");
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
