use crate::domain::MeasureCatalog;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions};
use std::{path::PathBuf, time::Duration};
use tracing_log::log::LevelFilter;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub lookup: LookupSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub acquire_timeout_milliseconds: u64,
}

impl DatabaseSettings {
    /// Options used by the lookup service. The store must already exist and
    /// is opened read-only.
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(false)
            .read_only(true)
            .log_statements(LevelFilter::Trace)
    }

    /// Options used by the provisioning run, which owns the file.
    pub fn provisioning_options(&self) -> SqliteConnectOptions {
        self.connect_options()
            .read_only(false)
            .create_if_missing(true)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_milliseconds)
    }
}

#[derive(Deserialize)]
pub struct LookupSettings {
    measures: Vec<String>,
}

impl LookupSettings {
    pub fn catalog(&self) -> MeasureCatalog {
        MeasureCatalog::new(self.measures.iter().cloned())
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            measures: MeasureCatalog::default()
                .names()
                .map(ToOwned::to_owned)
                .collect(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let config_dir = std::env::current_dir()
        .map(|dir| dir.join("configuration"))
        .map_err(|e| {
            config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
        })?;

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let env_config = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(config::File::from(config_dir.join(env_config)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
