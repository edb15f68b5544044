// Application state for HTTP handlers
use crate::application::dashboard_controller::DashboardController;
use crate::application::poll_loop::PollLoop;
use crate::presentation::snapshot_view::SnapshotView;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DashboardController>,
    pub poll_loop: Arc<PollLoop>,
    pub view: Arc<SnapshotView>,
}
