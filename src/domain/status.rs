// System status domain models
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Manual,
    Automatic,
    Unconnected,
    NotAvailable,
    /// A mode string the dashboard does not know; shown verbatim.
    Unrecognized(String),
}

impl Mode {
    /// Map a wire string to a mode. Unknown values are kept, not rejected.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "MANUAL" => Self::Manual,
            "AUTOMATIC" => Self::Automatic,
            "UNCONNECTED" => Self::Unconnected,
            "NOT_AVAILABLE" => Self::NotAvailable,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Manual => "MANUAL",
            Self::Automatic => "AUTOMATIC",
            Self::Unconnected => "UNCONNECTED",
            Self::NotAvailable => "NOT_AVAILABLE",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Target of a mode switch. Only MANUAL flips to AUTOMATIC; every other
    /// mode is treated as automatic and flips to MANUAL.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Manual => Self::Automatic,
            _ => Self::Manual,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Valve opening percentage, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValveOpening(u8);

impl ValveOpening {
    pub const MAX: u8 = 100;

    pub fn new(percent: i64) -> Option<Self> {
        if (0..=i64::from(Self::MAX)).contains(&percent) {
            Some(Self(percent as u8))
        } else {
            None
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ValveOpening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    pub mode: Mode,
    pub valve_opening: Option<ValveOpening>,
}

impl SystemStatus {
    pub fn new(mode: Mode, valve_opening: Option<ValveOpening>) -> Self {
        Self {
            mode,
            valve_opening,
        }
    }

    /// Client-side fallback used whenever the status cannot be fetched.
    pub fn not_available() -> Self {
        Self::new(Mode::NotAvailable, None)
    }
}
