use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "job_tracker";

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid APP_LOG_LEVEL '{}': unable to build a log filter", value)
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Turn `APP_LOG_LEVEL` into a filter directive.
///
/// A bare level such as `debug` applies to this crate only; dependencies stay at `warn`. Anything
/// containing `=` or `,` is already a full directive and is passed through.
pub fn filter_directive(log_level: &str) -> String {
    let trimmed = log_level.trim();
    if trimmed.contains('=') || trimmed.contains(',') {
        trimmed.to_string()
    } else {
        format!("warn,{CRATE_TARGET}={trimmed}")
    }
}

fn configured_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directive = filter_directive(&config.log_level);
    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Install the subscriber. Output goes to stderr so it never interleaves with menu or export
/// output on stdout. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => configured_filter(config)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: log_level.to_string(),
        }
    }

    #[test]
    fn bare_level_is_scoped_to_this_crate() {
        assert_eq!(filter_directive(" debug "), "warn,job_tracker=debug");
        assert!(configured_filter(&config("info")).is_ok());
    }

    #[test]
    fn full_directives_pass_through() {
        assert_eq!(filter_directive("info,csv=trace"), "info,csv=trace");
        assert_eq!(filter_directive("job_tracker=trace"), "job_tracker=trace");
    }

    #[test]
    fn unknown_level_is_reported_with_the_configured_value() {
        let err = configured_filter(&config("loud")).expect_err("invalid level");

        assert!(matches!(&err, TelemetryError::EnvFilter { value, .. } if value == "loud"));
        assert!(err.to_string().contains("'loud'"));
    }
}
