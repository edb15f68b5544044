// Snapshot view - Publishes the rendered dashboard to browser clients
use crate::application::view::{DashboardView, Notification, PollState};
use crate::domain::reading::Reading;
use crate::domain::status::Mode;
use crate::domain::ui_state::{
    BadgeClass, ControlState, PLACEHOLDER, badge_class, control_state, slider_label,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::sync::watch;

pub const DATASET_LABEL: &str = "Rainwater level (cm)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub ts: DateTime<Utc>,
    pub value: f64,
    /// Tooltip title, HH:MM:SS in local time
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    pub title: String,
    pub dataset_label: &'static str,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeSnapshot {
    pub text: String,
    pub badge: BadgeClass,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderSnapshot {
    pub value: i64,
    pub label: String,
    pub aria_value_now: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshot {
    pub running: bool,
    pub button_label: &'static str,
    pub button_class: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: u64,
    #[serde(flatten)]
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub chart: ChartSnapshot,
    pub mode: ModeSnapshot,
    pub valve_text: String,
    pub slider: SliderSnapshot,
    pub controls: ControlState,
    pub last_update: String,
    pub refresh: RefreshSnapshot,
    pub loading: bool,
    pub toast: Option<Toast>,
}

impl DashboardSnapshot {
    pub fn new(max_readings: usize) -> Self {
        let mode = Mode::NotAvailable;
        Self {
            chart: ChartSnapshot {
                title: format!("Rainwater Level (last {} samples)", max_readings),
                dataset_label: DATASET_LABEL,
                points: Vec::new(),
            },
            mode: ModeSnapshot {
                text: mode.as_str().to_string(),
                badge: badge_class(&mode),
            },
            valve_text: PLACEHOLDER.to_string(),
            slider: SliderSnapshot {
                value: 0,
                label: slider_label(0),
                aria_value_now: 0,
            },
            controls: control_state(&mode),
            last_update: String::new(),
            refresh: RefreshSnapshot::from_state(PollState::Paused),
            // cleared by the end of the initial load
            loading: true,
            toast: None,
        }
    }
}

impl RefreshSnapshot {
    fn from_state(state: PollState) -> Self {
        match state {
            PollState::Running => Self {
                running: true,
                button_label: "Pause",
                button_class: "btn btn-success",
            },
            PollState::Paused => Self {
                running: false,
                button_label: "Resume",
                button_class: "btn btn-warning",
            },
        }
    }
}

pub fn chart_points(readings: &[Reading]) -> Vec<ChartPoint> {
    readings
        .iter()
        .map(|r| ChartPoint {
            ts: r.timestamp,
            value: r.value,
            label: r.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string(),
        })
        .collect()
}

/// `DashboardView` backed by a watch channel; every change becomes a new snapshot.
pub struct SnapshotView {
    tx: watch::Sender<DashboardSnapshot>,
}

impl SnapshotView {
    pub fn new(max_readings: usize) -> Self {
        let (tx, _rx) = watch::channel(DashboardSnapshot::new(max_readings));
        Self { tx }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.tx.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut DashboardSnapshot)) {
        self.tx.send_modify(f);
    }
}

impl DashboardView for SnapshotView {
    fn render_chart(&self, readings: &[Reading]) {
        let points = chart_points(readings);
        self.update(|s| s.chart.points = points);
    }

    fn set_mode_text(&self, text: &str) {
        self.update(|s| s.mode.text = text.to_string());
    }

    fn set_badge(&self, badge: BadgeClass) {
        self.update(|s| s.mode.badge = badge);
    }

    fn set_valve_text(&self, text: &str) {
        self.update(|s| s.valve_text = text.to_string());
    }

    fn set_slider(&self, value: i64) {
        self.update(|s| {
            s.slider = SliderSnapshot {
                value,
                label: slider_label(value),
                aria_value_now: value,
            }
        });
    }

    fn set_controls(&self, controls: ControlState) {
        self.update(|s| s.controls = controls);
    }

    fn set_last_update(&self, text: &str) {
        self.update(|s| s.last_update = text.to_string());
    }

    fn set_refresh(&self, state: PollState) {
        self.update(|s| s.refresh = RefreshSnapshot::from_state(state));
    }

    fn set_loading(&self, loading: bool) {
        self.update(|s| s.loading = loading);
    }

    fn notify(&self, notification: Notification) {
        self.update(|s| {
            let id = s.toast.as_ref().map_or(1, |t| t.id + 1);
            s.toast = Some(Toast { id, notification });
        });
    }
}
