//! Endpoint parsing with credential separation.
//!
//! A server endpoint such as `postgres://reader:pw@db:5432/shop` is split
//! into loggable [`ConnectionInfo`] and [`Credentials`].

use super::credentials::Credentials;
use crate::error::JcatalogError;

/// Endpoint details with credentials removed; safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// URL scheme, e.g. "postgres"
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub database: Option<String>,
    /// Query parameters such as `sslmode`
    pub query_params: Vec<(String, String)>,
}

impl ConnectionInfo {
    /// Reconstructs the endpoint without user info.
    ///
    /// # Example
    /// ```rust
    /// use jcatalog_core::security::ConnectionInfo;
    ///
    /// let info = ConnectionInfo {
    ///     scheme: "postgres".to_string(),
    ///     host: "localhost".to_string(),
    ///     port: Some(5432),
    ///     database: Some("shop".to_string()),
    ///     query_params: vec![],
    /// };
    /// assert_eq!(info.to_safe_string(), "postgres://localhost:5432/shop");
    /// ```
    pub fn to_safe_string(&self) -> String {
        let mut url = format!("{}://{}", self.scheme, self.host);

        if let Some(port) = self.port {
            url.push_str(&format!(":{}", port));
        }

        if let Some(database) = &self.database {
            url.push_str(&format!("/{}", database));
        }

        if !self.query_params.is_empty() {
            let params: Vec<String> = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            url.push('?');
            url.push_str(&params.join("&"));
        }

        url
    }
}

/// Splits a server endpoint into connection info and credentials.
///
/// # Errors
/// Returns a configuration error if the endpoint is not a URL or names no
/// host. The error text never includes the endpoint itself.
///
/// # Example
/// ```rust
/// use jcatalog_core::security::parse_connection_string;
///
/// let (info, creds) = parse_connection_string("postgres://reader:pw@localhost/shop")?;
/// assert_eq!(info.host, "localhost");
/// assert_eq!(creds.username(), "reader");
/// assert!(creds.has_password());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_connection_string(
    connection_string: &str,
) -> crate::Result<(ConnectionInfo, Credentials)> {
    let url = url::Url::parse(connection_string).map_err(|e| {
        JcatalogError::configuration(format!("Invalid connection string format: {}", e))
    })?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| JcatalogError::configuration("Missing host in connection string"))?
        .to_string();

    let database = url
        .path()
        .strip_prefix('/')
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let credentials = Credentials::new(
        url.username().to_string(),
        url.password().map(str::to_string),
    );

    let info = ConnectionInfo {
        scheme: url.scheme().to_string(),
        host,
        port: url.port(),
        database,
        query_params: url.query_pairs().into_owned().collect(),
    };

    Ok((info, credentials))
}
