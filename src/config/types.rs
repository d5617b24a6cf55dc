// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// JSON payload sent by the notify, stream and transact routes.
///
/// Kept as a literal so the bytes on the wire match the fixture clients expect,
/// including the space after the colon.
pub const TEST_PAYLOAD: &str = r#"{"message": "This is a test JSON message"}"#;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    /// Route table, replaced as a whole when present in a config source
    #[serde(default = "default_routes")]
    pub routes: Vec<Route>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, `RUST_LOG` takes precedence
    pub level: String,
    pub access_log: bool,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PerformanceConfig {
    #[serde(default)]
    pub max_connections: Option<u64>,
}

/// Binding of an exact request path to the behavior run for the session
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    #[serde(flatten)]
    pub handler: RouteHandler,
}

impl Route {
    pub fn new(path: impl Into<String>, handler: RouteHandler) -> Self {
        Self {
            path: path.into(),
            handler,
        }
    }
}

/// Session behaviors
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteHandler {
    /// Send one message, then close
    Notify {
        #[serde(default = "default_payload")]
        payload: String,
    },
    /// Send `count` messages spaced by `interval_ms`, then close
    Stream {
        #[serde(default = "default_payload")]
        payload: String,
        #[serde(default = "default_stream_count")]
        count: u32,
        #[serde(default = "default_stream_interval_ms")]
        interval_ms: u64,
    },
    /// Reply `prefix + message` to every inbound message until closed
    Echo {
        #[serde(default = "default_echo_prefix")]
        prefix: String,
    },
    /// Reply a fixed payload to every inbound message until closed
    Transact {
        #[serde(default = "default_payload")]
        payload: String,
    },
}

impl RouteHandler {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Notify { .. } => "notify",
            Self::Stream { .. } => "stream",
            Self::Echo { .. } => "echo",
            Self::Transact { .. } => "transact",
        }
    }
}

fn default_payload() -> String {
    TEST_PAYLOAD.to_string()
}

const fn default_stream_count() -> u32 {
    5
}

const fn default_stream_interval_ms() -> u64 {
    1000
}

fn default_echo_prefix() -> String {
    "Echo: ".to_string()
}

/// Routes served when no `routes` table is configured
pub fn default_routes() -> Vec<Route> {
    vec![
        Route::new(
            "/test",
            RouteHandler::Notify {
                payload: default_payload(),
            },
        ),
        Route::new(
            "/test/stream",
            RouteHandler::Stream {
                payload: default_payload(),
                count: default_stream_count(),
                interval_ms: default_stream_interval_ms(),
            },
        ),
        Route::new(
            "/test/request",
            RouteHandler::Echo {
                prefix: default_echo_prefix(),
            },
        ),
        Route::new(
            "/test/transaction",
            RouteHandler::Transact {
                payload: default_payload(),
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct RoutesFile {
        routes: Vec<Route>,
    }

    #[test]
    fn test_payload_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(TEST_PAYLOAD).unwrap();
        assert_eq!(value["message"], "This is a test JSON message");
    }

    #[test]
    fn test_default_routes_cover_fixture_paths() {
        let paths: Vec<_> = default_routes().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/test", "/test/stream", "/test/request", "/test/transaction"]
        );
    }

    #[test]
    fn test_route_handler_from_toml() {
        let file: RoutesFile = toml::from_str(
            r#"
            [[routes]]
            path = "/ticks"
            type = "stream"
            payload = "tick"
            count = 3
            interval_ms = 250

            [[routes]]
            path = "/echo"
            type = "echo"
            "#,
        )
        .unwrap();

        assert_eq!(
            file.routes[0],
            Route::new(
                "/ticks",
                RouteHandler::Stream {
                    payload: "tick".to_string(),
                    count: 3,
                    interval_ms: 250,
                }
            )
        );
        assert_eq!(
            file.routes[1].handler,
            RouteHandler::Echo {
                prefix: "Echo: ".to_string()
            }
        );
    }

    #[test]
    fn test_route_handler_fills_defaults() {
        let file: RoutesFile = toml::from_str(
            r#"
            [[routes]]
            path = "/s"
            type = "stream"
            "#,
        )
        .unwrap();

        assert_eq!(
            file.routes[0].handler,
            RouteHandler::Stream {
                payload: TEST_PAYLOAD.to_string(),
                count: 5,
                interval_ms: 1000,
            }
        );
        assert_eq!(file.routes[0].handler.kind(), "stream");
    }

    #[test]
    fn test_unknown_handler_type_rejected() {
        let result: Result<RoutesFile, _> = toml::from_str(
            r#"
            [[routes]]
            path = "/x"
            type = "broadcast"
            "#,
        );
        assert!(result.is_err());
    }
}
