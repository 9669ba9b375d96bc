// Configuration module entry point
// Loads layered configuration and holds shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, StorageConfig};

/// Prefix for environment overrides, e.g. `CONTACT_SERVER__PORT=9000`
const ENV_PREFIX: &str = "CONTACT";

/// Connection string that switches storage to the networked database
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

impl Config {
    /// Load configuration using the first CLI argument as config path
    /// Default config file is "config.toml" when no path specified
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional)
    pub fn load_from(config_path: &str) -> Result<Self, ::config::ConfigError> {
        Self::build(config_path, std::env::var(DATABASE_URL_VAR).ok())
    }

    fn build(
        config_path: &str,
        database_url: Option<String>,
    ) -> Result<Self, ::config::ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "contact-site")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("site.template_dir", "templates")?
            .set_default("site.static_dir", "static")?
            .set_default("site.health_enabled", true)?
            .set_default("site.health_path", "/health")?
            .set_default("storage.sqlite_path", "database.db")?
            .set_override_option("storage.database_url", database_url)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        // Only presence matters; a blank connection string counts as unset
        cfg.storage.database_url = cfg
            .storage
            .database_url
            .filter(|url| !url.trim().is_empty());
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
