//! Credential handling for database endpoints.
//!
//! # Security Guarantees
//! - Credentials are stored in `Zeroizing` containers for automatic memory clearing
//! - Endpoints are split so only the credential-free part is ever logged
//!
//! # Module Structure
//! - `credentials`: Secure credential container and URL merging
//! - `connection`: Endpoint parsing and info extraction

mod connection;
mod credentials;

pub use connection::{ConnectionInfo, parse_connection_string};
pub use credentials::Credentials;
