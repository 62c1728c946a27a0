use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the intake service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub registration: RegistrationConfig,
    pub geocoding: GeocodingConfig,
    pub snapshots: SnapshotConfig,
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

        let registration = RegistrationConfig {
            base_url: env::var("REGISTRATION_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string()),
            timeout: timeout_from_env("REGISTRATION_TIMEOUT_SECS", 10)?,
        };

        let geocoding = GeocodingConfig {
            endpoint: env::var("GEOCODING_ENDPOINT")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),
            timeout: timeout_from_env("GEOCODING_TIMEOUT_SECS", 10)?,
        };

        let snapshots = SnapshotConfig {
            dir: PathBuf::from(env::var("SNAPSHOT_DIR").unwrap_or_else(|_| ".".to_string())),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            registration,
            geocoding,
            snapshots,
        })
    }
}

fn timeout_from_env(key: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    let secs = match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout { key })?,
        Err(_) => default_secs,
    };
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout { key });
    }
    Ok(Duration::from_secs(secs))
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

/// Where and how the remote registration endpoints are reached.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Address-search endpoint used by the enrichment gate.
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

/// Directory receiving the local CSV snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout { key } => {
                write!(f, "{key} must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
