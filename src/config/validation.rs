//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reload URL must be absolute http(s)
//! - Timeouts must be non-zero
//! - Bind addresses must parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SidecarConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::SidecarConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("collector.config_file must not be empty")]
    EmptyConfigPath,

    #[error("collector.reload_url {url:?} is invalid: {reason}")]
    InvalidReloadUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &SidecarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.collector.config_file.trim().is_empty() {
        errors.push(ValidationError::EmptyConfigPath);
    }

    match Url::parse(&config.collector.reload_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidReloadUrl {
            url: config.collector.reload_url.clone(),
            reason: format!("unsupported scheme {}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidReloadUrl {
            url: config.collector.reload_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.collector.reload_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "collector.reload_timeout_secs",
        });
    }
    if config.transaction.handshake_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "transaction.handshake_timeout_secs",
        });
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&SidecarConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SidecarConfig::default();
        config.collector.config_file = " ".into();
        config.collector.reload_url = "ftp://collector/reload".into();
        config.transaction.handshake_timeout_secs = 0;
        config.admin.bind_address = "localhost".into();
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::EmptyConfigPath));
        assert!(errors.contains(&ValidationError::ZeroTimeout {
            field: "transaction.handshake_timeout_secs"
        }));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_disabled_admin_skips_address_check() {
        let mut config = SidecarConfig::default();
        config.admin.enabled = false;
        config.admin.bind_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_relative_reload_url_is_rejected() {
        let mut config = SidecarConfig::default();
        config.collector.reload_url = "/-/reload".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidReloadUrl { .. }));
    }
}
