// Configuration module entry point
// Layered loading: optional config file, environment overrides, built-in defaults

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PagesConfig, PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, later wins: built-in defaults, the config file (optional),
    /// `SERVER_*` environment variables, and finally the conventional `PORT`
    /// variable for the listen port.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "Testpage-Server/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("pages.file", "static/index.html")?
            .set_default("pages.routes", vec!["/", "/testpage"])?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        // PORT is the conventional deployment variable and wins over all other
        // sources. It must parse as a valid TCP port or startup fails.
        if let Ok(port) = std::env::var("PORT") {
            cfg.server.port = port.parse().map_err(|e| {
                config::ConfigError::Message(format!("invalid PORT value '{port}': {e}"))
            })?;
        }

        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
