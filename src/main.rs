// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_controller::DashboardController;
use crate::application::poll_loop::PollLoop;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_control_api::HttpControlApi;
use crate::presentation::app_state::AppState;
use crate::presentation::router::dashboard_router;
use crate::presentation::snapshot_view::SnapshotView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Control API client (infrastructure layer)
    let api = Arc::new(HttpControlApi::new(&config.api.base_url));

    // View and controller (presentation + application layers)
    let view = Arc::new(SnapshotView::new(config.poll.max_readings));
    let controller = Arc::new(DashboardController::new(
        api,
        view.clone(),
        config.poll.max_readings,
    ));
    let poll_loop = Arc::new(PollLoop::new(controller.clone(), config.poll.interval()));

    // Start polling, then load the first cycle in the background
    poll_loop.start().await;
    tokio::spawn({
        let controller = controller.clone();
        async move { controller.initial_load().await }
    });

    let state = Arc::new(AppState {
        controller,
        poll_loop,
        view,
    });

    let router = dashboard_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        %addr,
        control_api = %config.api.base_url,
        "Starting rainwater dashboard"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
