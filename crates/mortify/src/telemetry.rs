use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    BadFilter {
        directive: String,
        source: ParseError,
    },
    InstallFailed(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::BadFilter { directive, .. } => {
                write!(f, "log filter '{directive}' does not parse")
            }
            TelemetryError::InstallFailed(err) => {
                write!(f, "subscriber install failed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::BadFilter { source, .. } => Some(source),
            TelemetryError::InstallFailed(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` takes precedence; the configured level is the fallback for
/// processes launched without one.
fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level).map_err(|source| TelemetryError::BadFilter {
        directive: level.to_string(),
        source,
    })
}

/// Installs the process-wide tracing subscriber: compact format, no ANSI,
/// no target column. Calling twice fails on the second install.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::InstallFailed)
}
