use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::elasticsearch::ElasticConfig;
use domain_events::{DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_IN_FLIGHT};
use std::str::FromStr;
use std::time::Duration;

pub use core_config::Environment;

/// Which store backs the events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventsBackend {
    Elasticsearch,
    Memory,
}

impl FromStr for EventsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elasticsearch" | "elastic" | "es" => Ok(Self::Elasticsearch),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!(
                "unknown backend '{}', expected 'elasticsearch' or 'memory'",
                other
            )),
        }
    }
}

/// Event manager settings
#[derive(Clone, Debug)]
pub struct EventsConfig {
    pub backend: EventsBackend,
    pub max_in_flight: usize,
    pub call_timeout: Duration,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            backend: EventsBackend::Elasticsearch,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl FromEnv for EventsConfig {
    /// Reads:
    /// - EVENTS_BACKEND: `elasticsearch` (default) or `memory`
    /// - EVENTS_MAX_IN_FLIGHT: defaults to 64, must be positive
    /// - EVENTS_CALL_TIMEOUT_MS: defaults to 10000, must be positive
    fn from_env() -> Result<Self, ConfigError> {
        let backend = env_parse("EVENTS_BACKEND", EventsBackend::Elasticsearch)?;

        let max_in_flight = env_parse("EVENTS_MAX_IN_FLIGHT", DEFAULT_MAX_IN_FLIGHT)?;
        if max_in_flight == 0 {
            return Err(ConfigError::InvalidValue {
                key: "EVENTS_MAX_IN_FLIGHT".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        let call_timeout_ms = env_parse(
            "EVENTS_CALL_TIMEOUT_MS",
            DEFAULT_CALL_TIMEOUT.as_millis() as u64,
        )?;
        if call_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "EVENTS_CALL_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            backend,
            max_in_flight,
            call_timeout: Duration::from_millis(call_timeout_ms),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub events: EventsConfig,
    /// Present only when the Elasticsearch backend is selected
    pub elasticsearch: Option<ElasticConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let events = EventsConfig::from_env()?;
        let elasticsearch = match events.backend {
            EventsBackend::Elasticsearch => Some(ElasticConfig::from_env()?),
            EventsBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            events,
            elasticsearch,
        })
    }
}
