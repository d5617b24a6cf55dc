// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};

// Re-export public types
pub use state::AppState;
pub use types::{default_routes, Config, Route, RouteHandler};
#[cfg(test)]
pub use types::TEST_PAYLOAD;

/// Values given on the command line, applied over every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        Self::load_with(
            config::File::with_name(config_path).required(false),
            overrides,
        )
    }

    /// Layer defaults, the given file source, `WS_*` environment variables and overrides
    fn load_with<S>(file: S, overrides: &Overrides) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("WS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "localhost")?
            .set_default("server.port", 8765)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    /// Resolve `server.host:server.port`, preferring an IPv4 address
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let addrs: Vec<SocketAddr> = (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address {}:{}: {e}", self.server.host, self.server.port))?
            .collect();

        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                format!(
                    "Address {}:{} resolved to nothing",
                    self.server.host, self.server.port
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load_toml(toml: &str, overrides: &Overrides) -> Config {
        Config::load_with(File::from_str(toml, FileFormat::Toml), overrides).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist", &Overrides::default()).unwrap();
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.server.port, 8765);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert!(cfg.performance.max_connections.is_none());
        assert_eq!(cfg.routes, default_routes());
    }

    #[test]
    fn test_file_values_and_routes() {
        let cfg = load_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9001

            [performance]
            max_connections = 16

            [[routes]]
            path = "/only"
            type = "transact"
            payload = "ok"
            "#,
            &Overrides::default(),
        );

        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.performance.max_connections, Some(16));
        assert_eq!(
            cfg.routes,
            vec![Route::new(
                "/only",
                RouteHandler::Transact {
                    payload: "ok".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_overrides_win() {
        let cfg = load_toml(
            "[server]\nhost = \"0.0.0.0\"\nport = 9001\n",
            &Overrides {
                host: Some("127.0.0.1".to_string()),
                port: Some(9100),
            },
        );
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9100);
    }

    #[test]
    fn test_socket_addr_resolution() {
        let cfg = load_toml(
            "[server]\nhost = \"127.0.0.1\"\nport = 8765\n",
            &Overrides::default(),
        );
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8765".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let cfg = load_toml(
            "[server]\nhost = \"not a host name\"\n",
            &Overrides::default(),
        );
        assert!(cfg.get_socket_addr().is_err());
    }
}
