use std::convert::Infallible;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Deployment stage the process runs in. Anything unrecognized counts as
/// development so a missing variable never blocks startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl FromStr for AppEnvironment {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        })
    }
}

/// Process configuration for the viability judge, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

/// HTTP bind settings. The CLI may override either field before serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl AppConfig {
    /// Reads `APP_*` variables after a best-effort `.env` load. Every
    /// variable has a default; only unparseable values fail.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env_or("APP_ENV", "development")
            .parse::<AppEnvironment>()
            .unwrap_or(AppEnvironment::Development);

        let raw_port = env_or("APP_PORT", "8080");
        let port = raw_port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: raw_port })?;

        Ok(Self {
            environment,
            server: ServerConfig {
                host: env_or("APP_HOST", "0.0.0.0"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", "info"),
            },
        })
    }
}

impl ServerConfig {
    /// Resolves the configured host and port into a bindable address.
    /// `localhost` is accepted as a spelling of the loopback address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{value}' is not a valid port number")
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST '{host}' is not an IP address or 'localhost'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_app_vars() {
        for key in ["APP_ENV", "APP_HOST", "APP_PORT", "APP_LOG_LEVEL"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_lock().lock().expect("env mutex poisoned");
        clear_app_vars();

        let config = AppConfig::load().expect("config loads with defaults");

        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn environment_labels_parse_case_insensitively() {
        let _lock = env_lock().lock().expect("env mutex poisoned");
        clear_app_vars();
        env::set_var("APP_ENV", "PRODUCTION");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let _lock = env_lock().lock().expect("env mutex poisoned");
        clear_app_vars();
        env::set_var("APP_HOST", "localhost");

        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));

        env::remove_var("APP_HOST");
    }

    #[test]
    fn unparseable_port_names_the_offending_value() {
        let _lock = env_lock().lock().expect("env mutex poisoned");
        clear_app_vars();
        env::set_var("APP_PORT", "judge");

        let error = AppConfig::load().expect_err("port must fail to parse");
        assert!(error.to_string().contains("judge"));
        assert!(matches!(error, ConfigError::InvalidPort { .. }));

        env::remove_var("APP_PORT");
    }

    #[test]
    fn hostnames_other_than_localhost_are_rejected() {
        let server = ServerConfig {
            host: "judge.internal".to_string(),
            port: 8080,
        };

        let error = server.socket_addr().expect_err("hostname must fail");
        assert!(matches!(error, ConfigError::InvalidHost { .. }));
    }
}
