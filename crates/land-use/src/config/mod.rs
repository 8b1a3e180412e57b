use crate::calculator::{CalculationOptions, RoundingMode};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub calculator: CalculatorDefaults,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let apply_efficiency_incentive = match env::var("APP_EFFICIENCY_INCENTIVE") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidIncentiveFlag(raw))?,
            Err(_) => false,
        };
        let rounding = match env::var("APP_ROUNDING_MODE") {
            Ok(raw) => parse_rounding(&raw).ok_or(ConfigError::InvalidRoundingMode(raw))?,
            Err(_) => RoundingMode::AtOutput,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            calculator: CalculatorDefaults {
                apply_efficiency_incentive,
                rounding,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Calculation options applied when a request does not set its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalculatorDefaults {
    pub apply_efficiency_incentive: bool,
    pub rounding: RoundingMode,
}

impl CalculatorDefaults {
    pub fn options(&self) -> CalculationOptions {
        CalculationOptions {
            apply_efficiency_incentive: self.apply_efficiency_incentive,
            rounding: self.rounding,
            ..CalculationOptions::default()
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_rounding(raw: &str) -> Option<RoundingMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "output" | "at_output" => Some(RoundingMode::AtOutput),
        "per_field" | "field" => Some(RoundingMode::PerField),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidIncentiveFlag(String),
    InvalidRoundingMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidIncentiveFlag(value) => write!(
                f,
                "APP_EFFICIENCY_INCENTIVE must be true/false, got '{}'",
                value
            ),
            ConfigError::InvalidRoundingMode(value) => write!(
                f,
                "APP_ROUNDING_MODE must be 'output' or 'per_field', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidIncentiveFlag(_)
            | ConfigError::InvalidRoundingMode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_EFFICIENCY_INCENTIVE");
        env::remove_var("APP_ROUNDING_MODE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.calculator, CalculatorDefaults::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_calculator_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_EFFICIENCY_INCENTIVE", "Yes");
        env::set_var("APP_ROUNDING_MODE", "per_field");
        let config = AppConfig::load().expect("config loads");
        let options = config.calculator.options();
        assert!(options.apply_efficiency_incentive);
        assert_eq!(options.rounding, RoundingMode::PerField);
        reset_env();
    }

    #[test]
    fn rejects_unknown_rounding_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ROUNDING_MODE", "banker");
        let error = AppConfig::load().expect_err("invalid rounding mode");
        assert!(matches!(error, ConfigError::InvalidRoundingMode(ref value) if value == "banker"));
        reset_env();
    }
}
