// Failures of the control API and of local command validation
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("control API returned HTTP {status}")]
    Http { status: u16 },

    #[error("valve opening {0} is outside 0-100")]
    Validation(i64),

    #[error("valve controls are disabled in {0} mode")]
    ControlsDisabled(String),

    #[error("malformed response: {0}")]
    Parse(String),
}

