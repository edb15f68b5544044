// Domain layer - Readings, system status and derived UI state
pub mod reading;
pub mod status;
pub mod ui_state;
