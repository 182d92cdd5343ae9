use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_redis")]
    pub redis_url: String,
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,
    #[serde(default = "default_places_api_key")]
    pub places_api_key: String,
    /// Cached place payloads are served for this long.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Outbound Places API ceiling: at most this many calls...
    #[serde(default = "default_rate_limit_max_calls")]
    pub rate_limit_max_calls: usize,
    /// ...within a rolling window of this many seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
}

fn default_port() -> u16 { 4004 }
fn default_redis() -> String { "redis://localhost:6379".into() }
fn default_jwt_secret() -> String { "development-secret-change-in-production".into() }
fn default_places_base_url() -> String { "https://maps.googleapis.com/maps/api/place".into() }
fn default_places_api_key() -> String { "development-places-key".into() }
fn default_cache_ttl_secs() -> u64 { 600 }
fn default_rate_limit_max_calls() -> usize { 90 }
fn default_rate_limit_window_secs() -> u64 { 60 }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PAWS_LOCATION").separator("__"))
            .build()?;
        Ok(config.try_deserialize().unwrap_or_else(|_| Self {
            port: default_port(),
            redis_url: default_redis(),
            jwt_secret: default_jwt_secret(),
            places_base_url: default_places_base_url(),
            places_api_key: default_places_api_key(),
            cache_ttl_secs: default_cache_ttl_secs(),
            rate_limit_max_calls: default_rate_limit_max_calls(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
        }))
    }
}
