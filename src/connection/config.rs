//! Connection settings.

use std::time::Duration;

/// Where to connect and how long to wait.
///
/// # Example
///
/// ```
/// use flashjson::connection::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("10.0.0.5", 6380)
///     .with_response_timeout(Duration::from_secs(2));
/// assert_eq!(config.address(), "10.0.0.5:6380");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on TCP connection establishment. `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
    /// Upper bound on one request/reply exchange. `None` waits indefinitely.
    pub response_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
            connect_timeout: None,
            response_timeout: None,
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// Returns the address as `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_redis() {
        let config = ConnectionConfig::default();
        assert_eq!(config.address(), "127.0.0.1:6379");
        assert!(config.connect_timeout.is_none());
        assert!(config.response_timeout.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ConnectionConfig::new("redis", 7000)
            .with_connect_timeout(Duration::from_millis(250))
            .with_response_timeout(Duration::from_secs(1));
        assert_eq!(config.host, "redis");
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.response_timeout, Some(Duration::from_secs(1)));
    }
}
