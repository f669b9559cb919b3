use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Take the client IP from the first `X-Forwarded-For` entry
    /// instead of the TCP peer. Only enable behind a trusted proxy.
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            trust_forwarded_for: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub sessions_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sessions_dir: PathBuf::from("sessions"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub rate_window_ms: u64,
    pub rate_max: usize,
    pub max_contacts: usize,
    pub body_limit_bytes: usize,
    pub rate_sweep_interval_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            rate_window_ms: 60_000,
            rate_max: 20,
            max_contacts: 1000,
            body_limit_bytes: 50 * 1024,
            rate_sweep_interval_secs: 60,
        }
    }
}

impl LimitsConfig {
    pub fn rate_window(&self) -> Duration {
        Duration::from_millis(self.rate_window_ms)
    }

    pub fn rate_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WebConfig {
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Settings {
    /// Defaults, then `config/settings.toml`, then `APP__*` env vars,
    /// then `PORT`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = match std::env::var("PORT") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            ),
            Err(_) => None,
        };

        let config = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
