use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub storage: Storage,
    pub webhooks: Webhooks,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Storage {
    /// Directory holding one SQLite file per webhook.
    pub base_path: String,
    /// Ceiling on concurrently retained storage units; the
    /// least-recently-modified unit is evicted beyond it.
    pub max_databases: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Webhooks {
    /// Total stored-request capacity per webhook.
    pub max_requests: i64,
    /// Admissions per rate window per webhook; 0 disables rate limiting.
    pub rate_limit: u32,
    pub rate_window_ms: u64,
    /// Base URL advertised in created-webhook responses; falls back to the
    /// request's Host header when unset.
    pub public_base_url: Option<String>,
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("HOOKBIN").separator("__"))
        .build()?
        .try_deserialize()
}
