use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct DuffelConfig {
    pub api_url: String,
    pub access_token: String,
    pub api_version: String,
}

#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
}

impl SanityConfig {
    /// Host da API de consulta; o CDN é usado para leituras quando habilitado
    pub fn base_url(&self) -> String {
        let host = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{}.sanity.io", self.project_id, host)
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub duffel: DuffelConfig,
    pub sanity: SanityConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = env::var("DUFFEL_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("DUFFEL_ACCESS_TOKEN"))?;

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 3000)?,
            upstream_timeout: Duration::from_secs(parse_var("UPSTREAM_TIMEOUT_SECS", 30)?),
            cors_allowed_origins: parse_list(&var_or(
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000",
            )),
            duffel: DuffelConfig {
                api_url: var_or("DUFFEL_API_URL", "https://api.duffel.com"),
                access_token,
                api_version: var_or("DUFFEL_API_VERSION", "v2"),
            },
            sanity: SanityConfig {
                project_id: var_or("SANITY_PROJECT_ID", "6d2pzg6a"),
                dataset: var_or("SANITY_DATASET", "production"),
                api_version: var_or("SANITY_API_VERSION", "2023-08-12"),
                use_cdn: parse_bool("SANITY_USE_CDN", true)?,
            },
            cache: CacheConfig {
                capacity: parse_var("CACHE_CAPACITY", 1000)?,
                ttl: Duration::from_secs(parse_var("CACHE_TTL_SECONDS", 3600)?),
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
