use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Deployment stage. Selects log defaults and terminal styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Self::Development),
            "test" | "ci" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Filter used when neither `RUST_LOG` nor `HIRERANK_LOG_LEVEL` is set.
    fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "hirerank=debug,hirerank_api=debug,info",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Settings for the scoring service, read from `.env` and `HIRERANK_*`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = match env::var("HIRERANK_ENV") {
            Ok(value) => AppEnvironment::parse(&value)?,
            Err(_) => AppEnvironment::Development,
        };

        let server = ServerConfig {
            host: env::var("HIRERANK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("HIRERANK_PORT", 3000, ConfigError::InvalidPort)?,
        };

        let telemetry = TelemetryConfig {
            log_level: env::var("HIRERANK_LOG_LEVEL")
                .unwrap_or_else(|_| environment.default_log_level().to_string()),
            ansi: environment == AppEnvironment::Development,
        };

        let state_ttl_hours = parse_var("HIRERANK_STATE_TTL_HOURS", 72, ConfigError::InvalidStateTtl)?;
        if state_ttl_hours == 0 {
            return Err(ConfigError::InvalidStateTtl);
        }
        let storage = StorageConfig {
            dir: env::var_os("HIRERANK_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".data")),
            state_ttl_hours,
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            storage,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T, error: ConfigError) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| error),
        Err(_) => Ok(default),
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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Where the flat-file repositories live and how long staged evidence is kept.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub state_ttl_hours: u32,
}

impl StorageConfig {
    pub fn state_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.state_ttl_hours))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStateTtl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvironment(value) => write!(
                f,
                "HIRERANK_ENV '{value}' is not one of development, test or production"
            ),
            ConfigError::InvalidPort => write!(f, "HIRERANK_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "HIRERANK_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStateTtl => {
                write!(f, "HIRERANK_STATE_TTL_HOURS must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    const VARS: [&str; 6] = [
        "HIRERANK_ENV",
        "HIRERANK_HOST",
        "HIRERANK_PORT",
        "HIRERANK_LOG_LEVEL",
        "HIRERANK_STORAGE_DIR",
        "HIRERANK_STATE_TTL_HOURS",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    /// Run `check` with exactly `vars` set among the service variables.
    fn with_env(vars: &[(&str, &str)], check: impl FnOnce()) {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for name in VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }
        check();
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn defaults_suit_local_development() {
        with_env(&[], || {
            let config = AppConfig::load().expect("config loads with defaults");
            assert_eq!(config.environment, AppEnvironment::Development);
            assert_eq!(config.server.socket_addr().expect("addr").port(), 3000);
            assert!(config.telemetry.log_level.starts_with("hirerank=debug"));
            assert!(config.telemetry.ansi);
            assert_eq!(config.storage.dir, PathBuf::from(".data"));
            assert_eq!(config.storage.state_ttl(), chrono::Duration::hours(72));
        });
    }

    #[test]
    fn production_logs_plainly_unless_overridden() {
        with_env(&[("HIRERANK_ENV", "prod")], || {
            let config = AppConfig::load().expect("config loads");
            assert_eq!(config.environment, AppEnvironment::Production);
            assert_eq!(config.telemetry.log_level, "info");
            assert!(!config.telemetry.ansi);
        });

        with_env(
            &[("HIRERANK_ENV", "ci"), ("HIRERANK_LOG_LEVEL", "hirerank=trace")],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.environment, AppEnvironment::Test);
                assert_eq!(config.telemetry.log_level, "hirerank=trace");
            },
        );
    }

    #[test]
    fn storage_and_ttl_come_from_env() {
        with_env(
            &[
                ("HIRERANK_STORAGE_DIR", "/var/lib/hirerank"),
                ("HIRERANK_STATE_TTL_HOURS", " 24 "),
                ("HIRERANK_HOST", "localhost"),
            ],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.storage.dir, PathBuf::from("/var/lib/hirerank"));
                assert_eq!(config.storage.state_ttl(), chrono::Duration::hours(24));
                assert_eq!(
                    config.server.socket_addr().expect("localhost resolves"),
                    SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000)
                );
            },
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases: [(&str, &str, fn(&ConfigError) -> bool); 4] = [
            ("HIRERANK_ENV", "staging", |err| {
                matches!(err, ConfigError::InvalidEnvironment(value) if value == "staging")
            }),
            ("HIRERANK_PORT", "70000", |err| {
                matches!(err, ConfigError::InvalidPort)
            }),
            ("HIRERANK_STATE_TTL_HOURS", "0", |err| {
                matches!(err, ConfigError::InvalidStateTtl)
            }),
            ("HIRERANK_STATE_TTL_HOURS", "-3", |err| {
                matches!(err, ConfigError::InvalidStateTtl)
            }),
        ];

        for (name, value, expected) in cases {
            with_env(&[(name, value)], || {
                let error = AppConfig::load().expect_err("invalid value rejected");
                assert!(expected(&error), "{name}={value} gave {error}");
            });
        }
    }
}
