// Poll loop - Repeating refresh timer with start/stop semantics
use crate::application::dashboard_controller::DashboardController;
use crate::application::view::{Notification, PollState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

/// Fires a refresh every `period`, one period after start.
///
/// Each tick spawns its own cycle and never waits for earlier ones, so slow
/// cycles overlap with newer ones. Stopping cancels the timer only; cycles
/// already in flight still complete.
pub struct PollLoop {
    controller: Arc<DashboardController>,
    period: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl PollLoop {
    pub fn new(controller: Arc<DashboardController>, period: Duration) -> Self {
        Self {
            controller,
            period,
            timer: Mutex::new(None),
        }
    }

    /// Returns `false` when the loop was already running.
    pub async fn start(&self) -> bool {
        let mut timer = self.timer.lock().await;
        if timer.is_some() {
            return false;
        }

        let controller = self.controller.clone();
        let period = self.period;
        *timer = Some(tokio::spawn(async move {
            let mut ticks = IntervalStream::new(interval_at(Instant::now() + period, period));
            while ticks.next().await.is_some() {
                let controller = controller.clone();
                tokio::spawn(async move { controller.refresh().await });
            }
        }));

        tracing::info!(period_ms = period.as_millis() as u64, "Auto refresh started");
        self.controller.view().set_refresh(PollState::Running);
        true
    }

    /// Returns `false` when the loop was already stopped.
    pub async fn stop(&self) -> bool {
        let Some(handle) = self.timer.lock().await.take() else {
            return false;
        };
        handle.abort();

        tracing::info!("Auto refresh paused");
        self.controller.view().set_refresh(PollState::Paused);
        true
    }

    pub async fn toggle(&self) -> PollState {
        let state = if self.stop().await {
            PollState::Paused
        } else {
            self.start().await;
            PollState::Running
        };

        let message = match state {
            PollState::Running => "Auto refresh resumed",
            PollState::Paused => "Auto refresh paused",
        };
        self.controller
            .view()
            .notify(Notification::info("Auto Refresh", message));
        state
    }

    #[cfg(test)]
    pub async fn state(&self) -> PollState {
        if self.timer.lock().await.is_some() {
            PollState::Running
        } else {
            PollState::Paused
        }
    }
}
