//! Session settings for sources the exporter opens itself.
//!
//! Where to connect is always taken from the endpoint URL; this struct only
//! carries how each session behaves.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pool and session settings for metadata connections.
///
/// # Security
/// No credentials live here. They travel in the connection URL (see
/// [`Credentials`](crate::security::Credentials)) and are never serialized.
///
/// # Example
/// ```rust
/// use jcatalog_core::adapters::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new().with_query_timeout(Duration::from_secs(5));
///
/// assert!(config.read_only);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// How long to wait for a connection
    pub connect_timeout: Duration,
    /// Per-statement timeout applied to every session
    pub query_timeout: Duration,
    /// Maximum number of connections in an owned pool
    pub max_connections: u32,
    /// Open sessions read-only
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(30),
            max_connections: 2,
            read_only: true,
        }
    }
}

impl ConnectionConfig {
    /// Creates read-only settings with default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates pool and session settings.
    ///
    /// # Errors
    /// Returns error if a limit is zero or the pool size exceeds 100
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_connections == 0 {
            return Err(crate::error::JcatalogError::configuration(
                "max_connections must be greater than 0",
            ));
        }

        if self.max_connections > 100 {
            return Err(crate::error::JcatalogError::configuration(
                "max_connections should not exceed 100",
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(crate::error::JcatalogError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.query_timeout.is_zero() {
            return Err(crate::error::JcatalogError::configuration(
                "query_timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Builder method to set the connection acquire timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the per-statement timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_default() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.query_timeout, Duration::from_secs(30));
        assert!(config.read_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_config_validation() {
        let config = ConnectionConfig {
            max_connections: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectionConfig {
            max_connections: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectionConfig::new().with_query_timeout(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = ConnectionConfig::new().with_connect_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connection_config_partial_json() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{ "max_connections": 4 }"#).unwrap();

        assert_eq!(config.max_connections, 4);
        assert!(config.read_only);
    }
}
