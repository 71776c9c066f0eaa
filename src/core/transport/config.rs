//! Transport configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::env_parse;
use crate::core::error::{Error, Result};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// WebSocket listener, one JSON-RPC message per frame (default).
    #[cfg(feature = "websocket")]
    WebSocket(WebSocketConfig),

    /// A single connection over stdin/stdout, one message per line.
    #[cfg(feature = "stdio")]
    Stdio,
}

/// WebSocket transport configuration.
#[cfg(feature = "websocket")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the WebSocket upgrade endpoint.
    #[serde(default = "default_path")]
    pub path: String,

    /// Seconds between keepalive pings; `0` disables keepalive.
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval_secs: u64,

    /// Seconds a peer has to answer a ping before it is disconnected.
    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout_secs: u64,
}

/// Resolved keepalive timings.
#[cfg(feature = "websocket")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepaliveConfig {
    /// Idle time before a ping is sent.
    pub interval: Duration,
    /// Time allowed for any frame to arrive after a ping.
    pub timeout: Duration,
}

#[cfg(feature = "websocket")]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "websocket")]
fn default_path() -> String {
    "/".to_string()
}

#[cfg(feature = "websocket")]
fn default_keepalive_interval() -> u64 {
    20
}

#[cfg(feature = "websocket")]
fn default_keepalive_timeout() -> u64 {
    10
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "websocket")]
        {
            return Self::WebSocket(WebSocketConfig::default());
        }

        #[cfg(all(not(feature = "websocket"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "websocket", feature = "stdio")))]
        {
            compile_error!("At least one transport feature must be enabled: websocket or stdio");
        }
    }
}

#[cfg(feature = "websocket")]
impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            port: 8765,
            host: default_host(),
            path: default_path(),
            keepalive_interval_secs: default_keepalive_interval(),
            keepalive_timeout_secs: default_keepalive_timeout(),
        }
    }
}

#[cfg(feature = "websocket")]
impl WebSocketConfig {
    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Keepalive timings, or `None` when keepalive is disabled.
    pub fn keepalive(&self) -> Option<KeepaliveConfig> {
        (self.keepalive_interval_secs > 0).then(|| KeepaliveConfig {
            interval: Duration::from_secs(self.keepalive_interval_secs),
            timeout: Duration::from_secs(self.keepalive_timeout_secs),
        })
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("MCP_WS_PORT").unwrap_or(defaults.port),
            host: std::env::var("MCP_WS_HOST").unwrap_or(defaults.host),
            path: std::env::var("MCP_WS_PATH").unwrap_or(defaults.path),
            keepalive_interval_secs: env_parse("MCP_KEEPALIVE_INTERVAL_SECS")
                .unwrap_or(defaults.keepalive_interval_secs),
            keepalive_timeout_secs: env_parse("MCP_KEEPALIVE_TIMEOUT_SECS")
                .unwrap_or(defaults.keepalive_timeout_secs),
        }
    }
}

impl TransportConfig {
    /// Create a WebSocket transport config.
    #[cfg(feature = "websocket")]
    pub fn websocket(port: u16, host: impl Into<String>) -> Self {
        Self::WebSocket(WebSocketConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "websocket")]
            "" | "websocket" | "ws" => Self::WebSocket(WebSocketConfig::from_env()),
            other => {
                if !other.is_empty() {
                    warn!("Unknown MCP_TRANSPORT {:?}, using the default transport", other);
                }
                Self::default()
            }
        }
    }

    /// Reject settings the transport cannot run with.
    pub fn validate(&self) -> Result<()> {
        match self {
            #[cfg(feature = "websocket")]
            Self::WebSocket(cfg) => {
                if !cfg.path.starts_with('/') {
                    return Err(Error::config(format!(
                        "WebSocket path must start with '/', got {:?}",
                        cfg.path
                    )));
                }
                if cfg.keepalive_interval_secs > 0 && cfg.keepalive_timeout_secs == 0 {
                    return Err(Error::config(
                        "MCP_KEEPALIVE_TIMEOUT_SECS must be greater than 0 when keepalive is enabled",
                    ));
                }
                Ok(())
            }
            #[cfg(feature = "stdio")]
            Self::Stdio => Ok(()),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "websocket")]
            Self::WebSocket(cfg) => format!("WebSocket on ws://{}{}", cfg.address(), cfg.path),
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (newline-delimited JSON-RPC)".to_string(),
        }
    }
}

#[cfg(all(test, feature = "websocket"))]
mod tests {
    use super::*;
    use crate::core::config::tests::ENV_TEST_LOCK;

    #[test]
    fn test_default_is_websocket_on_8765() {
        let TransportConfig::WebSocket(cfg) = TransportConfig::default() else {
            panic!("default transport should be websocket");
        };
        assert_eq!(cfg.address(), "127.0.0.1:8765");
        assert_eq!(
            cfg.keepalive(),
            Some(KeepaliveConfig {
                interval: Duration::from_secs(20),
                timeout: Duration::from_secs(10),
            })
        );
    }

    #[test]
    fn test_zero_interval_disables_keepalive() {
        let cfg = WebSocketConfig {
            keepalive_interval_secs: 0,
            ..Default::default()
        };
        assert!(cfg.keepalive().is_none());
    }

    #[test]
    fn test_validate() {
        assert!(TransportConfig::default().validate().is_ok());

        let bad_path = TransportConfig::WebSocket(WebSocketConfig {
            path: "mcp".into(),
            ..Default::default()
        });
        assert!(bad_path.validate().is_err());

        let bad_timeout = TransportConfig::WebSocket(WebSocketConfig {
            keepalive_timeout_secs: 0,
            ..Default::default()
        });
        assert!(bad_timeout.validate().is_err());
    }

    #[test]
    fn test_websocket_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "websocket");
            std::env::set_var("MCP_WS_PORT", "9001");
            std::env::set_var("MCP_KEEPALIVE_INTERVAL_SECS", "not-a-number");
        }
        let TransportConfig::WebSocket(cfg) = TransportConfig::from_env() else {
            panic!("expected websocket transport");
        };
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.keepalive_interval_secs, 20);
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
            std::env::remove_var("MCP_WS_PORT");
            std::env::remove_var("MCP_KEEPALIVE_INTERVAL_SECS");
        }
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_stdio_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "STDIO");
        }
        assert!(matches!(TransportConfig::from_env(), TransportConfig::Stdio));
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
        }
    }
}
