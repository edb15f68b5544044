// Route table for the browser-facing surface
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, health_check, send_valve, slider_drag, slider_input, stream_dashboard,
    toggle_mode, toggle_refresh,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// Snapshot is compressed on request; the SSE stream never is.
pub fn dashboard_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard).layer(CompressionLayer::new()))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/dashboard/mode/toggle", post(toggle_mode))
        .route("/dashboard/valve", post(send_valve))
        .route("/dashboard/slider", post(slider_input))
        .route("/dashboard/slider/drag", post(slider_drag))
        .route("/dashboard/refresh/toggle", post(toggle_refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
