// Test doubles for the control API and the view
use crate::application::control_api::ControlApi;
use crate::application::error::DashboardError;
use crate::application::view::{DashboardView, Notification, PollState};
use crate::domain::reading::Reading;
use crate::domain::status::{Mode, SystemStatus, ValveOpening};
use crate::domain::ui_state::{BadgeClass, ControlState};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn reading(secs: i64, value: f64) -> Reading {
    Reading::new(Utc.timestamp_opt(secs, 0).unwrap(), value)
}

pub fn status(mode: Mode, opening: Option<i64>) -> SystemStatus {
    SystemStatus::new(mode, opening.and_then(ValveOpening::new))
}

type Scripted<T> = (Duration, Result<T, DashboardError>);

/// Scripted responses are consumed first; the fallback answers after that.
struct Script<T: Clone> {
    queue: VecDeque<Scripted<T>>,
    fallback: Result<T, DashboardError>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: Result<T, DashboardError>) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
        }
    }

    fn next(&mut self) -> Scripted<T> {
        self.queue
            .pop_front()
            .unwrap_or_else(|| (Duration::ZERO, self.fallback.clone()))
    }
}

pub struct FakeControlApi {
    readings: Mutex<Script<Vec<Reading>>>,
    status: Mutex<Script<SystemStatus>>,
    mode_result: Mutex<Result<(), DashboardError>>,
    valve_result: Mutex<Result<(), DashboardError>>,
    pub readings_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub readings_limits: Mutex<Vec<usize>>,
    pub mode_posts: Mutex<Vec<Mode>>,
    pub valve_posts: Mutex<Vec<u8>>,
}

impl Default for FakeControlApi {
    fn default() -> Self {
        Self {
            readings: Mutex::new(Script::new(Ok(Vec::new()))),
            status: Mutex::new(Script::new(Ok(SystemStatus::new(Mode::Automatic, None)))),
            mode_result: Mutex::new(Ok(())),
            valve_result: Mutex::new(Ok(())),
            readings_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            readings_limits: Mutex::new(Vec::new()),
            mode_posts: Mutex::new(Vec::new()),
            valve_posts: Mutex::new(Vec::new()),
        }
    }
}

impl FakeControlApi {
    pub fn set_readings(&self, result: Result<Vec<Reading>, DashboardError>) {
        self.readings.lock().unwrap().fallback = result;
    }

    pub fn push_readings(&self, delay: Duration, result: Result<Vec<Reading>, DashboardError>) {
        self.readings.lock().unwrap().queue.push_back((delay, result));
    }

    pub fn set_status(&self, result: Result<SystemStatus, DashboardError>) {
        self.status.lock().unwrap().fallback = result;
    }

    pub fn push_status(&self, delay: Duration, result: Result<SystemStatus, DashboardError>) {
        self.status.lock().unwrap().queue.push_back((delay, result));
    }

    pub fn set_mode_result(&self, result: Result<(), DashboardError>) {
        *self.mode_result.lock().unwrap() = result;
    }

    pub fn set_valve_result(&self, result: Result<(), DashboardError>) {
        *self.valve_result.lock().unwrap() = result;
    }

    pub fn readings_calls(&self) -> usize {
        self.readings_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn mode_posts(&self) -> Vec<Mode> {
        self.mode_posts.lock().unwrap().clone()
    }

    pub fn valve_posts(&self) -> Vec<u8> {
        self.valve_posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ControlApi for FakeControlApi {
    async fn get_readings(&self, limit: usize) -> Result<Vec<Reading>, DashboardError> {
        self.readings_calls.fetch_add(1, Ordering::SeqCst);
        self.readings_limits.lock().unwrap().push(limit);
        let (delay, result) = self.readings.lock().unwrap().next();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_status(&self) -> Result<SystemStatus, DashboardError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = self.status.lock().unwrap().next();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn set_mode(&self, mode: &Mode) -> Result<(), DashboardError> {
        self.mode_posts.lock().unwrap().push(mode.clone());
        self.mode_result.lock().unwrap().clone()
    }

    async fn set_valve(&self, opening: ValveOpening) -> Result<(), DashboardError> {
        self.valve_posts.lock().unwrap().push(opening.percent());
        self.valve_result.lock().unwrap().clone()
    }
}

/// Everything the controller last pushed to the view.
#[derive(Debug, Clone, Default)]
pub struct ViewLog {
    pub chart: Vec<Reading>,
    pub chart_renders: usize,
    pub mode_text: String,
    pub badge: Option<BadgeClass>,
    pub valve_text: String,
    pub slider: Option<i64>,
    pub controls: Option<ControlState>,
    pub last_update: String,
    pub refresh: Option<PollState>,
    pub loading: Option<bool>,
    pub notifications: Vec<Notification>,
}

#[derive(Default)]
pub struct RecordingView {
    log: Mutex<ViewLog>,
}

impl RecordingView {
    pub fn log(&self) -> ViewLog {
        self.log.lock().unwrap().clone()
    }

    pub fn last_notification(&self) -> Option<Notification> {
        self.log.lock().unwrap().notifications.last().cloned()
    }
}

impl DashboardView for RecordingView {
    fn render_chart(&self, readings: &[Reading]) {
        let mut log = self.log.lock().unwrap();
        log.chart = readings.to_vec();
        log.chart_renders += 1;
    }

    fn set_mode_text(&self, text: &str) {
        self.log.lock().unwrap().mode_text = text.to_string();
    }

    fn set_badge(&self, badge: BadgeClass) {
        self.log.lock().unwrap().badge = Some(badge);
    }

    fn set_valve_text(&self, text: &str) {
        self.log.lock().unwrap().valve_text = text.to_string();
    }

    fn set_slider(&self, value: i64) {
        self.log.lock().unwrap().slider = Some(value);
    }

    fn set_controls(&self, controls: ControlState) {
        self.log.lock().unwrap().controls = Some(controls);
    }

    fn set_last_update(&self, text: &str) {
        self.log.lock().unwrap().last_update = text.to_string();
    }

    fn set_refresh(&self, state: PollState) {
        self.log.lock().unwrap().refresh = Some(state);
    }

    fn set_loading(&self, loading: bool) {
        self.log.lock().unwrap().loading = Some(loading);
    }

    fn notify(&self, notification: Notification) {
        self.log.lock().unwrap().notifications.push(notification);
    }
}
