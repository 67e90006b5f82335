use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::assessment::Stanine;
use crate::workflows::placement::{DirectoryFailurePolicy, PlacementConfig, StanineSource};

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
    pub directory: DirectoryConfig,
    pub placement: PlacementConfig,
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

        let seed_dir = env::var("DIRECTORY_SEED_DIR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let failure_policy = match env::var("PLACEMENT_ON_DIRECTORY_FAILURE") {
            Ok(value) => parse_failure_policy(&value)?,
            Err(_) => DirectoryFailurePolicy::default(),
        };

        let stanine_source = match env::var("PLACEMENT_FIXED_STANINE") {
            Ok(value) if !value.trim().is_empty() => {
                StanineSource::Fixed(parse_stanine(&value)?)
            }
            _ => StanineSource::Profile,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            directory: DirectoryConfig { seed_dir },
            placement: PlacementConfig {
                failure_policy,
                stanine_source,
            },
        })
    }
}

fn parse_failure_policy(value: &str) -> Result<DirectoryFailurePolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "abort" => Ok(DirectoryFailurePolicy::Abort),
        "skip" | "skip_combination" => Ok(DirectoryFailurePolicy::SkipCombination),
        other => Err(ConfigError::InvalidFailurePolicy(other.to_string())),
    }
}

fn parse_stanine(value: &str) -> Result<Stanine, ConfigError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|raw| Stanine::new(raw).ok())
        .ok_or_else(|| ConfigError::InvalidStanine(value.trim().to_string()))
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

/// Where the school directory is seeded from. The service refuses to start without it.
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    pub seed_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFailurePolicy(String),
    InvalidStanine(String),
    MissingSeedDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFailurePolicy(value) => write!(
                f,
                "PLACEMENT_ON_DIRECTORY_FAILURE must be 'abort' or 'skip' (got '{value}')"
            ),
            ConfigError::InvalidStanine(value) => write!(
                f,
                "PLACEMENT_FIXED_STANINE must be an integer between 1 and 9 (got '{value}')"
            ),
            ConfigError::MissingSeedDir => write!(
                f,
                "DIRECTORY_SEED_DIR must point at the school directory CSV export"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFailurePolicy(_)
            | ConfigError::InvalidStanine(_)
            | ConfigError::MissingSeedDir => None,
        }
    }
}
