//! Listen address configuration.

use serde::{Deserialize, Serialize};

use crate::ScrawlError;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Host the server listens on by default (every interface).
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads the port from the `PORT` environment variable, falling back
    /// to [`DEFAULT_PORT`].
    ///
    /// # Errors
    /// [`ScrawlError::InvalidPort`] if `PORT` is set but isn't a port number.
    pub fn from_env() -> Result<Self, ScrawlError> {
        Self::with_port_var(std::env::var("PORT").ok().as_deref())
    }

    fn with_port_var(value: Option<&str>) -> Result<Self, ScrawlError> {
        let port = match value.map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw
                .parse()
                .map_err(|_| ScrawlError::InvalidPort(raw.to_owned()))?,
        };
        Ok(Self {
            port,
            ..Self::default()
        })
    }

    /// The `host:port` string handed to the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listens_on_3000() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_unset_or_blank_port_uses_default() {
        assert_eq!(ServerConfig::with_port_var(None).unwrap().port, 3000);
        assert_eq!(ServerConfig::with_port_var(Some("  ")).unwrap().port, 3000);
    }

    #[test]
    fn test_port_from_variable() {
        let config = ServerConfig::with_port_var(Some("8080")).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = ServerConfig::with_port_var(Some("eighty")).unwrap_err();
        assert!(matches!(err, ScrawlError::InvalidPort(ref v) if v == "eighty"));

        assert!(ServerConfig::with_port_var(Some("70000")).is_err());
    }
}
