use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::EnvFilter;

/// Transport crates that flood `debug` with per-connection events.
const QUIET_TARGETS: [&str; 2] = ["hyper=warn", "tower=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    Filter { value: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { value, .. } => {
                write!(f, "HIRERANK_LOG_LEVEL '{value}' is not a valid tracing filter")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a global log subscriber is already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. `RUST_LOG`, when valid, replaces the configured filter.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => service_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(config.ansi)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

/// Parse `level` and mute transport chatter unless `level` names those crates itself.
fn service_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    let invalid = |source| TelemetryError::Filter {
        value: level.to_string(),
        source,
    };

    let mut filter = EnvFilter::try_new(level).map_err(invalid)?;
    for quiet in QUIET_TARGETS {
        let target = quiet.split('=').next().unwrap_or(quiet);
        if level.split(',').any(|directive| directive.trim().starts_with(target)) {
            continue;
        }
        let directive: Directive = quiet.parse().map_err(invalid)?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_crates_are_muted_by_default() {
        let rendered = service_filter("hirerank=debug,info")
            .expect("valid filter")
            .to_string()
            .to_ascii_lowercase();
        assert!(rendered.contains("hyper=warn"));
        assert!(rendered.contains("tower=warn"));
        assert!(rendered.contains("hirerank=debug"));
    }

    #[test]
    fn explicit_transport_level_is_kept() {
        let rendered = service_filter("info,hyper=trace")
            .expect("valid filter")
            .to_string()
            .to_ascii_lowercase();
        assert!(rendered.contains("hyper=trace"));
        assert!(!rendered.contains("hyper=warn"));
        assert!(rendered.contains("tower=warn"));
    }

    #[test]
    fn bad_level_names_the_variable() {
        let error = service_filter("hirerank=verbose").expect_err("invalid level");
        let message = error.to_string();
        assert!(message.contains("HIRERANK_LOG_LEVEL"));
        assert!(message.contains("hirerank=verbose"));
    }

    #[test]
    fn second_install_is_refused() {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ansi: false,
        };
        let _ = init(&config);
        assert!(matches!(
            init(&config),
            Err(TelemetryError::AlreadyInstalled(_))
        ));
    }
}
