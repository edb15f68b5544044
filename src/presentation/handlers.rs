// HTTP request handlers
use crate::application::error::DashboardError;
use crate::application::view::PollState;
use crate::presentation::app_state::AppState;
use crate::presentation::snapshot_view::DashboardSnapshot;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ControlsDisabled(_) => StatusCode::CONFLICT,
            Self::Network(_) | Self::Http { .. } | Self::Parse(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct ValveResponse {
    pub opening: u8,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub running: bool,
}

#[derive(Debug, Deserialize)]
pub struct SliderInput {
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct SliderDrag {
    pub active: bool,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard snapshot
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.view.snapshot())
}

/// Live dashboard: one `snapshot` event on connect, then one per change
pub async fn stream_dashboard(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let mut rx = state.view.subscribe();

    let stream = async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            yield Event::default().event("snapshot").json_data(&snapshot);
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

pub async fn toggle_mode(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModeResponse>, DashboardError> {
    let mode = state.controller.switch_mode().await?;
    Ok(Json(ModeResponse {
        mode: mode.to_string(),
    }))
}

pub async fn send_valve(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ValveResponse>, DashboardError> {
    let opening = state.controller.send_valve().await?;
    Ok(Json(ValveResponse {
        opening: opening.percent(),
    }))
}

pub async fn slider_input(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SliderInput>,
) -> Result<StatusCode, DashboardError> {
    state.controller.slider_input(input.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn slider_drag(
    State(state): State<Arc<AppState>>,
    Json(drag): Json<SliderDrag>,
) -> StatusCode {
    if drag.active {
        state.controller.begin_slider_drag().await;
    } else {
        state.controller.end_slider_drag().await;
    }
    StatusCode::NO_CONTENT
}

/// Pause or resume auto refresh
pub async fn toggle_refresh(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let running = state.poll_loop.toggle().await == PollState::Running;
    Json(RefreshResponse { running })
}
