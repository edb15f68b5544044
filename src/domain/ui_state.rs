// UI state mapping - pure functions of the latest status
use super::status::{Mode, ValveOpening};
use serde::Serialize;

/// Shown in numeric displays when no value is known.
pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadgeClass {
    #[serde(rename = "bg-success")]
    Success,
    #[serde(rename = "bg-warning")]
    Warning,
    #[serde(rename = "bg-danger")]
    Danger,
    #[serde(rename = "bg-secondary")]
    Secondary,
}

pub fn badge_class(mode: &Mode) -> BadgeClass {
    match mode {
        Mode::Automatic => BadgeClass::Success,
        Mode::Manual => BadgeClass::Warning,
        Mode::Unconnected => BadgeClass::Danger,
        _ => BadgeClass::Secondary,
    }
}

/// Enablement of the manual valve controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    pub slider_enabled: bool,
    pub submit_enabled: bool,
    pub aria_disabled: bool,
}

impl ControlState {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            slider_enabled: enabled,
            submit_enabled: enabled,
            aria_disabled: !enabled,
        }
    }
}

pub fn controls_enabled(mode: &Mode) -> bool {
    *mode == Mode::Manual
}

pub fn control_state(mode: &Mode) -> ControlState {
    ControlState::enabled(controls_enabled(mode))
}

pub fn valve_text(opening: Option<ValveOpening>) -> String {
    opening
        .map(|o| o.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn slider_label(value: i64) -> String {
    format!("{}%", value)
}
