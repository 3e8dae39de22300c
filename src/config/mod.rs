//! Process configuration loaded entirely from the environment (spec.md §6).

use crate::gateway::OidcConfig;
use std::time::Duration;

/// All process-level settings, resolved once at startup. Every field is
/// environment-variable overridable with a documented default.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend_base_url: String,
    pub oidc: Option<OidcConfig>,
    pub callback_port: u16,
    pub dispatch_interval: Duration,
    pub scheduler_enabled: bool,
    pub callback_worker_threads: usize,
    pub gateway_connect_timeout: Duration,
    pub gateway_read_timeout: Duration,
    pub gateway_write_timeout: Duration,
}

impl EngineConfig {
    /// Builds the configuration from environment variables, falling back to
    /// documented defaults for anything unset. `BACKEND_BASE_URL` is the only
    /// variable without a usable default.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let oidc = match std::env::var("OIDC_TOKEN_URL") {
            Ok(token_url) => Some(OidcConfig {
                token_url,
                client_id: std::env::var("OIDC_CLIENT_ID").unwrap_or_default(),
                client_secret: std::env::var("OIDC_CLIENT_SECRET").unwrap_or_default(),
                realm: std::env::var("OIDC_REALM").ok(),
            }),
            Err(_) => None,
        };

        Ok(Self {
            backend_base_url: std::env::var("BACKEND_BASE_URL")?,
            oidc,
            callback_port: env_parsed("CALLBACK_PORT", 8082)?,
            dispatch_interval: Duration::from_secs(env_parsed("DISPATCH_INTERVAL_SECONDS", 30)?),
            scheduler_enabled: env_parsed("SCHEDULER_ENABLED", true)?,
            callback_worker_threads: env_parsed("CALLBACK_WORKER_THREADS", 4)?,
            gateway_connect_timeout: Duration::from_secs(env_parsed(
                "GATEWAY_CONNECT_TIMEOUT_SECONDS",
                10,
            )?),
            gateway_read_timeout: Duration::from_secs(env_parsed(
                "GATEWAY_READ_TIMEOUT_SECONDS",
                30,
            )?),
            gateway_write_timeout: Duration::from_secs(env_parsed(
                "GATEWAY_WRITE_TIMEOUT_SECONDS",
                10,
            )?),
        })
    }
}

/// Parses an environment variable with a typed default, matching the
/// `unwrap_or_else(...).parse().unwrap_or(default)` idiom used throughout the
/// backend's own `from_env` constructors, but surfacing malformed overrides
/// as a startup error instead of silently falling back.
fn env_parsed<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.parse()?),
        Err(_) => Ok(default),
    }
}
