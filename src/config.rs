use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the bundled catalog files live
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Candidate search radius around the restaurant, in meters
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
    /// Maximum candidates returned per search
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            radius_m: default_radius_m(),
            limit: default_limit(),
        }
    }
}

fn default_radius_m() -> f64 {
    1000.0
}
fn default_limit() -> usize {
    3
}

/// Simulated latencies and the stub accept probability
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_restaurant_latency_ms")]
    pub restaurant_latency_ms: u64,
    #[serde(default = "default_search_latency_ms")]
    pub search_latency_ms: u64,
    #[serde(default = "default_request_latency_ms")]
    pub request_latency_ms: u64,
    #[serde(default = "default_chat_send_latency_ms")]
    pub chat_send_latency_ms: u64,
    #[serde(default = "default_chat_load_latency_ms")]
    pub chat_load_latency_ms: u64,
    /// Probability in [0, 1] that a match request is accepted
    #[serde(default = "default_accept_rate")]
    pub accept_rate: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            restaurant_latency_ms: default_restaurant_latency_ms(),
            search_latency_ms: default_search_latency_ms(),
            request_latency_ms: default_request_latency_ms(),
            chat_send_latency_ms: default_chat_send_latency_ms(),
            chat_load_latency_ms: default_chat_load_latency_ms(),
            accept_rate: default_accept_rate(),
        }
    }
}

fn default_restaurant_latency_ms() -> u64 {
    1000
}
fn default_search_latency_ms() -> u64 {
    1500
}
fn default_request_latency_ms() -> u64 {
    1000
}
fn default_chat_send_latency_ms() -> u64 {
    500
}
fn default_chat_load_latency_ms() -> u64 {
    1000
}
fn default_accept_rate() -> f64 {
    0.8
}

/// Coordinate reported by the fixed provider in the demo binary
#[derive(Debug, Clone, Deserialize)]
pub struct LocationSettings {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

fn default_latitude() -> f64 {
    31.2304
}
fn default_longitude() -> f64 {
    121.4737
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FOODMATE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. FOODMATE_MATCHING__RADIUS_M -> matching.radius_m
            .add_source(
                Environment::with_prefix("FOODMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FOODMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_defaults() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.radius_m, 1000.0);
        assert_eq!(matching.limit, 3);
    }

    #[test]
    fn test_simulation_defaults() {
        let simulation = SimulationSettings::default();
        assert_eq!(simulation.restaurant_latency_ms, 1000);
        assert_eq!(simulation.search_latency_ms, 1500);
        assert_eq!(simulation.request_latency_ms, 1000);
        assert_eq!(simulation.accept_rate, 0.8);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "pretty");
    }
}
