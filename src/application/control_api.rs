// Control API trait for readings, status and commands
use crate::application::error::DashboardError;
use crate::domain::reading::Reading;
use crate::domain::status::{Mode, SystemStatus, ValveOpening};
use async_trait::async_trait;

/// One network round-trip per call, no retries. Callers decide the fallback.
#[async_trait]
pub trait ControlApi: Send + Sync {
    /// Fetch the last `limit` readings
    async fn get_readings(&self, limit: usize) -> Result<Vec<Reading>, DashboardError>;

    /// Fetch the current mode and valve opening
    async fn get_status(&self) -> Result<SystemStatus, DashboardError>;

    async fn set_mode(&self, mode: &Mode) -> Result<(), DashboardError>;

    async fn set_valve(&self, opening: ValveOpening) -> Result<(), DashboardError>;
}
