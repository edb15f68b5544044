use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    pub poll: PollSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollSettings {
    pub interval_ms: u64,
    pub max_readings: usize,
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl DashboardConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.poll.interval_ms == 0 {
            anyhow::bail!("poll.interval_ms must be greater than zero");
        }
        if self.poll.max_readings == 0 {
            anyhow::bail!("poll.max_readings must be greater than zero");
        }
        Ok(())
    }
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("poll.interval_ms", 2000_i64)?
        .set_default("poll.max_readings", 60_i64)?
        .set_default("server.bind", "0.0.0.0:8080")?)
}

fn finish(settings: Config) -> anyhow::Result<DashboardConfig> {
    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// `DASHBOARD__POLL__INTERVAL_MS=500` sets `poll.interval_ms`
fn environment() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .separator("__")
        .try_parsing(true)
}

/// Defaults, then `config/dashboard.toml` if present, then `DASHBOARD__*` env vars
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment())
        .build()?;

    finish(settings)
}
