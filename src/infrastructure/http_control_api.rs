// Control API client over HTTP/JSON
use crate::application::control_api::ControlApi;
use crate::application::error::DashboardError;
use crate::domain::reading::Reading;
use crate::domain::status::{Mode, SystemStatus, ValveOpening};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HttpControlApi {
    client: Client,
    base_url: String,
}

/// `ts` arrives either as an ISO-8601 string or as epoch milliseconds
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Text(String),
    EpochMillis(f64),
}

#[derive(Debug, Deserialize)]
struct ReadingDto {
    ts: WireTimestamp,
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusDto {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    valve_opening: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ModeRequest<'a> {
    mode: &'a str,
}

#[derive(Debug, Serialize)]
struct ValveRequest {
    opening: u8,
}

impl WireTimestamp {
    fn to_utc(&self) -> Result<DateTime<Utc>, DashboardError> {
        match self {
            Self::Text(text) => parse_iso_timestamp(text),
            Self::EpochMillis(millis) => Utc
                .timestamp_millis_opt(*millis as i64)
                .single()
                .ok_or_else(|| DashboardError::Parse(format!("timestamp {} out of range", millis))),
        }
    }
}

/// RFC 3339 first; timestamps without an offset are taken as UTC, not local time.
fn parse_iso_timestamp(text: &str) -> Result<DateTime<Utc>, DashboardError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| DashboardError::Parse(format!("invalid timestamp {:?}: {}", text, e)))
}

impl ReadingDto {
    fn into_reading(self) -> Result<Reading, DashboardError> {
        Ok(Reading::new(self.ts.to_utc()?, self.value))
    }
}

impl StatusDto {
    fn into_status(self) -> Result<SystemStatus, DashboardError> {
        let mode = self
            .mode
            .as_deref()
            .map(Mode::from_wire)
            .unwrap_or(Mode::NotAvailable);

        let valve_opening = match self.valve_opening {
            None => None,
            Some(raw) => Some(
                ValveOpening::new(raw.round() as i64)
                    .filter(|_| raw.is_finite())
                    .ok_or_else(|| {
                        DashboardError::Parse(format!("valve opening {} outside 0-100", raw))
                    })?,
            ),
        };

        Ok(SystemStatus::new(mode, valve_opening))
    }
}

impl HttpControlApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DashboardError> {
        let response = request
            .send()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body_preview = %body.chars().take(200).collect::<String>(),
                "Failed to parse control API response"
            );
            DashboardError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ControlApi for HttpControlApi {
    async fn get_readings(&self, limit: usize) -> Result<Vec<Reading>, DashboardError> {
        let dtos: Vec<ReadingDto> = self
            .get_json(&format!("readings?limit={}", limit))
            .await?;
        dtos.into_iter().map(ReadingDto::into_reading).collect()
    }

    async fn get_status(&self) -> Result<SystemStatus, DashboardError> {
        let dto: StatusDto = self.get_json("status").await?;
        dto.into_status()
    }

    async fn set_mode(&self, mode: &Mode) -> Result<(), DashboardError> {
        let request = self
            .client
            .post(self.url("mode"))
            .json(&ModeRequest { mode: mode.as_str() });
        self.send(request).await?;
        Ok(())
    }

    async fn set_valve(&self, opening: ValveOpening) -> Result<(), DashboardError> {
        let request = self.client.post(self.url("valve")).json(&ValveRequest {
            opening: opening.percent(),
        });
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Posted = Arc<Mutex<Vec<Value>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{}/api/", addr)
    }

    async fn record(State(posted): State<Posted>, Json(body): Json<Value>) -> StatusCode {
        posted.lock().unwrap().push(body);
        StatusCode::OK
    }

    #[tokio::test]
    async fn test_get_readings_parses_both_timestamp_forms() {
        let router = Router::new().route(
            "/api/readings",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let limit: f64 = q["limit"].parse().unwrap();
                Json(json!([
                    { "ts": "2025-03-01T10:00:00Z", "value": limit },
                    { "ts": 1_740_823_260_000_i64, "value": 2.5 },
                    { "ts": "2025-03-01T10:02:00.250", "value": 3.0 }
                ]))
            }),
        );
        let api = HttpControlApi::new(&serve(router).await);

        let readings = api.get_readings(60).await.unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].value, 60.0);
        assert_eq!(readings[0].timestamp.to_rfc3339(), "2025-03-01T10:00:00+00:00");
        assert_eq!(readings[1].timestamp.timestamp(), 1_740_823_260);
        assert_eq!(readings[2].timestamp.to_rfc3339(), "2025-03-01T10:02:00.250+00:00");
    }

    #[tokio::test]
    async fn test_get_status_canonical_fields() {
        let router = Router::new().route(
            "/api/status",
            get(|| async { Json(json!({ "mode": "MANUAL", "valveOpening": 42.6, "extra": true })) }),
        );
        let api = HttpControlApi::new(&serve(router).await);

        let status = api.get_status().await.unwrap();

        assert_eq!(status.mode, Mode::Manual);
        assert_eq!(status.valve_opening.map(ValveOpening::percent), Some(43));
    }

    #[tokio::test]
    async fn test_get_status_missing_mode_is_not_available() {
        let router = Router::new().route("/api/status", get(|| async { Json(json!({})) }));
        let api = HttpControlApi::new(&serve(router).await);

        let status = api.get_status().await.unwrap();

        assert_eq!(status, SystemStatus::not_available());
    }

    #[tokio::test]
    async fn test_get_status_rejects_out_of_range_valve() {
        let router = Router::new().route(
            "/api/status",
            get(|| async { Json(json!({ "mode": "AUTOMATIC", "valveOpening": 130 })) }),
        );
        let api = HttpControlApi::new(&serve(router).await);

        assert!(matches!(api.get_status().await, Err(DashboardError::Parse(_))));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let router = Router::new().route(
            "/api/status",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let api = HttpControlApi::new(&serve(router).await);

        assert_eq!(api.get_status().await, Err(DashboardError::Http { status: 503 }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let router = Router::new().route("/api/readings", get(|| async { "not json" }));
        let api = HttpControlApi::new(&serve(router).await);

        assert!(matches!(api.get_readings(60).await, Err(DashboardError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = HttpControlApi::new(&format!("http://{}/api", addr));

        assert!(matches!(api.get_status().await, Err(DashboardError::Network(_))));
    }

    #[tokio::test]
    async fn test_commands_post_json_bodies() {
        let posted: Posted = Arc::default();
        let router = Router::new()
            .route("/api/mode", post(record))
            .route("/api/valve", post(record))
            .with_state(posted.clone());
        let api = HttpControlApi::new(&serve(router).await);

        api.set_mode(&Mode::Automatic).await.unwrap();
        api.set_valve(ValveOpening::new(45).unwrap()).await.unwrap();

        let bodies = posted.lock().unwrap().clone();
        assert_eq!(bodies, vec![json!({ "mode": "AUTOMATIC" }), json!({ "opening": 45 })]);
    }

    #[tokio::test]
    async fn test_rejected_command_is_http_error() {
        let router = Router::new().route(
            "/api/valve",
            post(|| async { (StatusCode::CONFLICT, "System not in MANUAL mode") }),
        );
        let api = HttpControlApi::new(&serve(router).await);

        let result = api.set_valve(ValveOpening::new(10).unwrap()).await;
        assert_eq!(result, Err(DashboardError::Http { status: 409 }));
    }
}
