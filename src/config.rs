use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use once_cell::sync::OnceCell;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Process-wide configuration, loaded once at startup.
static CONFIG: OnceCell<Config> = OnceCell::new();

pub const DEFAULT_API_HOST: &str = "email-scraper.p.rapidapi.com";
pub const DEFAULT_API_PATH: &str = "/v1/extract";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// API key and host identifier sent with every gateway call.
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub host: String,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: host.into(),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .finish()
    }
}

/// Wire contract with the contact API. None of it is fixed by the provider,
/// so every piece is configurable.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub scheme: String,
    pub path: String,
    pub query_param: String,
    pub key_header: String,
    pub host_header: String,
    pub timeout: Duration,
    pub cache_enabled: bool,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            path: DEFAULT_API_PATH.to_string(),
            query_param: "url".to_string(),
            key_header: "X-RapidAPI-Key".to_string(),
            host_header: "X-RapidAPI-Host".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when no API key is configured. Lookups then fail with a
    /// configuration error while the process keeps serving.
    pub credentials: Option<ApiCredentials>,
    pub api_host: String,
    pub gateway: GatewaySettings,
    pub require_scheme: bool,
    pub bind_addr: SocketAddr,
    pub log_level: tracing::Level,
}

impl Config {
    /// Read configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Useful for tests
    /// that must not touch the real environment.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_host = get_or_default("RAPIDAPI_HOST", DEFAULT_API_HOST);
        let credentials = lookup("RAPIDAPI_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| ApiCredentials::new(k, api_host.clone()));

        let defaults = GatewaySettings::default();
        let timeout_secs: u64 = parse_or_default(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }

        let gateway = GatewaySettings {
            scheme: get_or_default("RAPIDAPI_SCHEME", &defaults.scheme),
            path: normalize_path(&get_or_default("RAPIDAPI_PATH", &defaults.path)),
            query_param: get_or_default("RAPIDAPI_QUERY_PARAM", &defaults.query_param),
            key_header: get_or_default("RAPIDAPI_KEY_HEADER", &defaults.key_header),
            host_header: get_or_default("RAPIDAPI_HOST_HEADER", &defaults.host_header),
            timeout: Duration::from_secs(timeout_secs),
            cache_enabled: parse_bool(&lookup, "CACHE_ENABLED", true)?,
        };

        let bind_addr = get_or_default("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:8501")?;

        let log_level = tracing::Level::from_str(&get_or_default("LOG_LEVEL", "info"))
            .map_err(|e| anyhow!("invalid LOG_LEVEL: {e}"))?;

        Ok(Config {
            credentials,
            api_host,
            gateway,
            require_scheme: parse_bool(&lookup, "REQUIRE_URL_SCHEME", false)?,
            bind_addr,
            log_level,
        })
    }

    /// Initialize the global configuration from the environment.
    /// Call this once at application startup.
    pub fn init_global() -> Result<&'static Config> {
        let config = Self::from_env()?;
        CONFIG
            .set(config)
            .map_err(|_| anyhow!("Config already initialized"))?;
        Self::global().ok_or_else(|| anyhow!("Config not initialized"))
    }

    pub fn global() -> Option<&'static Config> {
        CONFIG.get()
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v
            .parse::<T>()
            .map_err(|e| anyhow!("invalid value for {key}: {e}")),
        _ => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(anyhow!("invalid boolean for {key}: {other}")),
        },
    }
}

/// An empty path stays empty; anything else gets exactly one leading slash.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
