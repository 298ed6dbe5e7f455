use anyhow::{ensure, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Longest history a request may ask for or supply (one year)
pub const MAX_HISTORY_HOURS: usize = 24 * 365;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            enable_cors: false,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// History length used when a request neither supplies rows nor asks for a length
    pub default_history_hours: usize,
    /// Fixed seed for reproducible synthetic data; unset in production
    pub random_seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_history_hours: 30 * 24,
            random_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    /// JSON lines when true, human-readable otherwise
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,hyper=warn,tower_http=info".to_string(),
            json: true,
        }
    }
}

impl Config {
    /// Defaults, then `config/default.toml`, then `GFS__SECTION__KEY` env vars
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("GFS__").split("__"));
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.generator.default_history_hours <= MAX_HISTORY_HOURS,
            "generator.default_history_hours must be at most {}, got {}",
            MAX_HISTORY_HOURS,
            self.generator.default_history_hours
        );
        ensure!(
            self.server.request_timeout_secs > 0,
            "server.request_timeout_secs must be positive"
        );
        Ok(())
    }
}
