// Dashboard controller - Fetch cycle and user commands
use crate::application::control_api::ControlApi;
use crate::application::error::DashboardError;
use crate::application::view::{DashboardView, Notification};
use crate::domain::reading::SeriesBuffer;
use crate::domain::status::{Mode, SystemStatus, ValveOpening};
use crate::domain::ui_state::{badge_class, control_state, controls_enabled, valve_text};
use chrono::Local;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mutable client-side state. Only touched in short critical sections,
/// never across a network call.
struct ClientState {
    series: SeriesBuffer,
    status: SystemStatus,
    slider_value: i64,
    slider_dragging: bool,
}

pub struct DashboardController {
    api: Arc<dyn ControlApi>,
    view: Arc<dyn DashboardView>,
    max_readings: usize,
    state: Mutex<ClientState>,
}

impl DashboardController {
    pub fn new(api: Arc<dyn ControlApi>, view: Arc<dyn DashboardView>, max_readings: usize) -> Self {
        Self {
            api,
            view,
            max_readings,
            state: Mutex::new(ClientState {
                series: SeriesBuffer::new(max_readings),
                status: SystemStatus::not_available(),
                slider_value: 0,
                slider_dragging: false,
            }),
        }
    }

    pub fn view(&self) -> &Arc<dyn DashboardView> {
        &self.view
    }

    /// First refresh after startup, with the loading overlay shown until it completes
    pub async fn initial_load(&self) {
        self.view.set_loading(true);
        self.refresh().await;
        self.view.set_loading(false);
    }

    /// Run one poll cycle. Failures degrade the view and are never returned.
    pub async fn refresh(&self) {
        match self.fetch_cycle().await {
            Ok(()) => tracing::debug!("Poll cycle completed"),
            Err(e) => {
                tracing::warn!(error = %e, "Poll cycle failed");
                self.show_unavailable().await;
            }
        }
    }

    async fn fetch_cycle(&self) -> Result<(), DashboardError> {
        let readings = self.api.get_readings(self.max_readings).await?;
        {
            let mut state = self.state.lock().await;
            state.series.replace(readings);
            tracing::debug!(readings = state.series.len(), "Series buffer replaced");
            self.view.render_chart(state.series.readings());
        }

        let status = self.api.get_status().await?;
        let mut state = self.state.lock().await;
        self.apply_status(&mut state, status);
        Ok(())
    }

    fn apply_status(&self, state: &mut ClientState, status: SystemStatus) {
        self.view.set_mode_text(status.mode.as_str());
        self.view.set_valve_text(&valve_text(status.valve_opening));

        // A drag in progress owns the slider
        if !state.slider_dragging {
            if let Some(opening) = status.valve_opening {
                state.slider_value = i64::from(opening.percent());
                self.view.set_slider(state.slider_value);
            }
        }

        self.view.set_badge(badge_class(&status.mode));
        self.view.set_controls(control_state(&status.mode));
        self.view
            .set_last_update(&format!("Updated: {}", Local::now().format("%H:%M:%S")));
        state.status = status;
    }

    async fn show_unavailable(&self) {
        let mut state = self.state.lock().await;
        state.status = SystemStatus::not_available();
        let mode = &state.status.mode;
        self.view.set_mode_text(mode.as_str());
        self.view.set_valve_text(&valve_text(None));
        self.view.set_badge(badge_class(mode));
        self.view.set_controls(control_state(mode));
        self.view.set_last_update("Update failed");
    }

    /// Flip between MANUAL and AUTOMATIC based on a fresh status read.
    pub async fn switch_mode(&self) -> Result<Mode, DashboardError> {
        match self.try_switch_mode().await {
            Ok(mode) => {
                tracing::info!(mode = %mode, "Mode switched");
                self.view.notify(Notification::success(
                    "Mode Changed",
                    format!("Switched to {} mode", mode),
                ));
                Ok(mode)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to switch mode");
                self.view
                    .notify(Notification::error("Error", "Failed to switch mode"));
                Err(e)
            }
        }
    }

    async fn try_switch_mode(&self) -> Result<Mode, DashboardError> {
        let current = self.api.get_status().await?;
        let target = current.mode.toggled();
        self.api.set_mode(&target).await?;
        self.refresh().await;
        Ok(target)
    }

    /// Send the slider's current value as the valve opening. Only allowed while
    /// the last known mode is MANUAL. No re-fetch is forced; the next poll shows
    /// the new opening.
    pub async fn send_valve(&self) -> Result<ValveOpening, DashboardError> {
        let (mode, value) = {
            let state = self.state.lock().await;
            (state.status.mode.clone(), state.slider_value)
        };
        if !controls_enabled(&mode) {
            tracing::warn!(mode = %mode, "Rejected valve command while controls are disabled");
            self.view.notify(Notification::error(
                "Manual Control Disabled",
                format!("Valve opening can only be set in MANUAL mode (currently {})", mode),
            ));
            return Err(DashboardError::ControlsDisabled(mode.to_string()));
        }

        let Some(opening) = ValveOpening::new(value) else {
            tracing::warn!(value, "Rejected valve opening outside 0-100");
            self.view.notify(Notification::error(
                "Invalid Value",
                "Valve opening must be between 0-100%",
            ));
            return Err(DashboardError::Validation(value));
        };

        match self.api.set_valve(opening).await {
            Ok(()) => {
                tracing::info!(opening = opening.percent(), "Valve opening sent");
                self.view.notify(Notification::success(
                    "Valve Updated",
                    format!("Valve opening set to {}%", opening),
                ));
                Ok(opening)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to set valve opening");
                self.view
                    .notify(Notification::error("Error", "Failed to set valve opening"));
                Err(e)
            }
        }
    }

    /// Live slider movement from the user; local only
    pub async fn slider_input(&self, value: i64) -> Result<(), DashboardError> {
        let mut state = self.state.lock().await;
        if !controls_enabled(&state.status.mode) {
            tracing::debug!(value, mode = %state.status.mode, "Ignored slider input");
            return Err(DashboardError::ControlsDisabled(state.status.mode.to_string()));
        }
        state.slider_value = value;
        self.view.set_slider(value);
        Ok(())
    }

    pub async fn begin_slider_drag(&self) {
        self.state.lock().await.slider_dragging = true;
    }

    pub async fn end_slider_drag(&self) {
        self.state.lock().await.slider_dragging = false;
    }
}

#[cfg(test)]
impl DashboardController {
    pub async fn last_status(&self) -> SystemStatus {
        self.state.lock().await.status.clone()
    }

    pub async fn controls_enabled(&self) -> bool {
        control_state(&self.state.lock().await.status.mode).slider_enabled
    }

    pub async fn series(&self) -> Vec<crate::domain::reading::Reading> {
        self.state.lock().await.series.readings().to_vec()
    }
}
