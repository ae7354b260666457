use alumni_core::matching::DEFAULT_RESPONSE_DAYS;

use crate::auth::jwt::JwtConfig;

/// Default interval between deadline sweeps, in seconds.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background services to drain on shutdown.
    pub shutdown_timeout_secs: u64,
    /// Days a mentor has to respond before a pending match expires, unless
    /// the program overrides it (default: `7`).
    pub match_response_days: i64,
    /// Interval between deadline sweeps in seconds (default: `300`).
    pub sweep_interval_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `MATCH_RESPONSE_DAYS`       | `7`                     |
    /// | `MATCH_SWEEP_INTERVAL_SECS` | `300`                   |
    ///
    /// # Panics
    ///
    /// Panics on any unparsable value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let match_response_days: i64 = std::env::var("MATCH_RESPONSE_DAYS")
            .unwrap_or_else(|_| DEFAULT_RESPONSE_DAYS.to_string())
            .parse()
            .expect("MATCH_RESPONSE_DAYS must be a valid i64");
        assert!(
            match_response_days >= 1,
            "MATCH_RESPONSE_DAYS must be at least 1"
        );

        let sweep_interval_secs: u64 = std::env::var("MATCH_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("MATCH_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(
            sweep_interval_secs > 0,
            "MATCH_SWEEP_INTERVAL_SECS must be greater than zero"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            match_response_days,
            sweep_interval_secs,
            jwt,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
