use crate::workflows::enrollment::{ClassCapacity, EnrollmentError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Number of months the forecast covers when nothing else is configured.
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

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
    pub planner: PlannerConfig,
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

        let capacity = match env::var("PLANNER_CAPACITY") {
            Ok(value) => parse_capacity(&value)?,
            Err(_) => ClassCapacity::default(),
        };
        let horizon_months = match env::var("PLANNER_HORIZON_MONTHS") {
            Ok(value) => parse_horizon(&value)?,
            Err(_) => DEFAULT_HORIZON_MONTHS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            planner: PlannerConfig {
                capacity,
                horizon_months,
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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Classroom sizes and forecast length shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub capacity: ClassCapacity,
    pub horizon_months: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            capacity: ClassCapacity::default(),
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

/// Parses a comma separated list of seat counts, youngest classroom first.
pub fn parse_capacity(value: &str) -> Result<ClassCapacity, ConfigError> {
    let invalid = |source: Option<EnrollmentError>| ConfigError::InvalidCapacity {
        value: value.to_string(),
        source,
    };

    let seats = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(None))?;

    ClassCapacity::new(&seats).map_err(|err| invalid(Some(err)))
}

pub fn parse_horizon(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(months) if months > 0 => Ok(months),
        _ => Err(ConfigError::InvalidHorizon {
            value: value.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidCapacity {
        value: String,
        source: Option<EnrollmentError>,
    },
    InvalidHorizon {
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCapacity { value, .. } => write!(
                f,
                "PLANNER_CAPACITY must list four seat counts, got '{}'",
                value
            ),
            ConfigError::InvalidHorizon { value } => write!(
                f,
                "PLANNER_HORIZON_MONTHS must be a positive number of months, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidHorizon { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidCapacity { source, .. } => source
                .as_ref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
        }
    }
}
