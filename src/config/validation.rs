//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parseable)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic configuration problem.
#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress(String),
    ZeroFetchTimeout,
    ZeroAbortGrace,
    EmptyDefaultScheme,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address {:?} is not a socket address", addr)
            }
            ValidationError::ZeroFetchTimeout => {
                write!(f, "upstream.fetch_timeout_secs must be at least 1")
            }
            ValidationError::ZeroAbortGrace => {
                write!(f, "upstream.abort_grace_ms must be at least 1")
            }
            ValidationError::EmptyDefaultScheme => {
                write!(f, "upstream.default_scheme must not be empty")
            }
        }
    }
}

/// Check semantic constraints, collecting every violation.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.upstream.fetch_timeout_secs == 0 {
        errors.push(ValidationError::ZeroFetchTimeout);
    }
    if config.upstream.abort_grace_ms == 0 {
        errors.push(ValidationError::ZeroAbortGrace);
    }
    if config.upstream.default_scheme.is_empty() {
        errors.push(ValidationError::EmptyDefaultScheme);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.fetch_timeout_secs = 0;
        config.upstream.default_scheme = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
