// View binding - the rendering surface the controller drives
use crate::domain::reading::Reading;
use crate::domain::ui_state::{BadgeClass, ControlState};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollState {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationKind::Success)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationKind::Error)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationKind::Info)
    }

    fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

/// Capability set of a dashboard surface.
///
/// Implementations use interior mutability; every method takes `&self` so a
/// single view can be shared between the poll loop and command handlers.
pub trait DashboardView: Send + Sync {
    /// Replace the plotted series with `readings` and redraw
    fn render_chart(&self, readings: &[Reading]);

    fn set_mode_text(&self, text: &str);

    fn set_badge(&self, badge: BadgeClass);

    fn set_valve_text(&self, text: &str);

    /// Move the slider and its percentage label
    fn set_slider(&self, value: i64);

    fn set_controls(&self, controls: ControlState);

    fn set_last_update(&self, text: &str);

    fn set_refresh(&self, state: PollState);

    fn set_loading(&self, loading: bool);

    fn notify(&self, notification: Notification);
}
