//! Startup configuration for the API process.
//!
//! All knobs are read from the environment exactly once at bootstrap,
//! validated, and passed into components by reference; operation logic
//! never reads ambient state.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use td_core::services::verification::VerificationConfig;

/// Which code-delivery channel to construct at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Log codes to the process log (development)
    Console,
    /// Capture codes in memory (tests, demos)
    Mock,
}

/// HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Fully validated process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub verification: VerificationConfig,
    pub delivery_mode: DeliveryMode,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid { var: String, message: String },
}

impl AppConfig {
    /// Reads and validates configuration from the environment.
    ///
    /// Unset variables fall back to development defaults; set-but-bad
    /// values fail startup rather than being silently corrected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("SERVER_PORT", 8080)?,
        };

        let verification = VerificationConfig {
            code_length: parse_var("VERIFICATION_CODE_LENGTH", 6)?,
            code_expiry_minutes: parse_var("VERIFICATION_CODE_EXPIRY_MINUTES", 5)?,
            cooldown_minutes: parse_var("VERIFICATION_COOLDOWN_MINUTES", 1)?,
            max_attempts: parse_var("VERIFICATION_MAX_ATTEMPTS", 3)?,
            default_country_code: env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "52".to_string()),
        };

        let delivery_mode = match env::var("CODE_DELIVERY_MODE").ok().as_deref() {
            Some("mock") => DeliveryMode::Mock,
            Some("console") | None => DeliveryMode::Console,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "CODE_DELIVERY_MODE".to_string(),
                    message: format!("unknown mode {other:?}, expected console or mock"),
                })
            }
        };

        let config = Self {
            server,
            verification,
            delivery_mode,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.verification;
        if !(4..=10).contains(&v.code_length) {
            return Err(invalid("VERIFICATION_CODE_LENGTH", "must be between 4 and 10"));
        }
        if v.code_expiry_minutes < 1 {
            return Err(invalid(
                "VERIFICATION_CODE_EXPIRY_MINUTES",
                "must be at least 1",
            ));
        }
        if v.cooldown_minutes < 1 {
            return Err(invalid("VERIFICATION_COOLDOWN_MINUTES", "must be at least 1"));
        }
        if v.max_attempts < 1 {
            return Err(invalid("VERIFICATION_MAX_ATTEMPTS", "must be at least 1"));
        }
        let cc = &v.default_country_code;
        if cc.is_empty() || cc.len() > 3 || !cc.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("DEFAULT_COUNTRY_CODE", "must be 1-3 digits"));
        }
        Ok(())
    }
}

fn invalid(var: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        var: var.to_string(),
        message: message.to_string(),
    }
}

fn parse_var<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(var) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: var.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
