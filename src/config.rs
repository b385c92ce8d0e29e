//! # Configuration Management
//!
//! Centralized configuration for the crypto input parcel.
//!
//! This module provides structured configuration for decoding limits, the
//! record transport, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`
//!
//! ## Security Considerations
//! - Decode limits bound allocations driven by untrusted length prefixes
//! - Sealing is on by default so passphrases never cross a process boundary in the clear
//! - A read timeout keeps a stalled peer from holding a channel open indefinitely

use crate::core::wire::{DecodeLimits, DEFAULT_MAX_FIELD_LEN, DEFAULT_MAX_MAP_ENTRIES};
use crate::error::{ParcelError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Current supported parcel version
pub const PARCEL_VERSION: u8 = 1;

/// Magic bytes to identify parcel packets (0x43494E50 → "CINP")
pub const MAGIC_BYTES: [u8; 4] = [0x43, 0x49, 0x4E, 0x50];

/// Max allowed payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Whether to seal payloads by default
pub const SEAL_PAYLOADS: bool = true;

/// Default time to wait for an incoming record
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ParcelConfig {
    /// Decoding limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ParcelConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ParcelError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ParcelError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ParcelError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(entries) = std::env::var("CRYPTO_INPUT_MAX_MAP_ENTRIES") {
            config.limits.max_map_entries = parse_env("CRYPTO_INPUT_MAX_MAP_ENTRIES", &entries)?;
        }

        if let Ok(len) = std::env::var("CRYPTO_INPUT_MAX_FIELD_LEN") {
            config.limits.max_field_len = parse_env("CRYPTO_INPUT_MAX_FIELD_LEN", &len)?;
        }

        if let Ok(timeout) = std::env::var("CRYPTO_INPUT_READ_TIMEOUT_MS") {
            let millis: u64 = parse_env("CRYPTO_INPUT_READ_TIMEOUT_MS", &timeout)?;
            config.transport.read_timeout = Duration::from_millis(millis);
        }

        if let Ok(seal) = std::env::var("CRYPTO_INPUT_SEAL_PAYLOADS") {
            config.transport.seal_payloads = parse_env("CRYPTO_INPUT_SEAL_PAYLOADS", &seal)?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ParcelError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ParcelError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.limits.validate());
        errors.extend(self.transport.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParcelError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ParcelError::ConfigError(format!("Invalid value for {name}: '{value}'")))
}

/// Bounds applied when decoding records from untrusted input
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum number of entries in any encoded map
    pub max_map_entries: usize,

    /// Maximum length of a single byte array or string
    pub max_field_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_map_entries: DEFAULT_MAX_MAP_ENTRIES,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

impl LimitsConfig {
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_map_entries: self.max_map_entries,
            max_field_len: self.max_field_len,
        }
    }

    /// Validate decode limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_map_entries == 0 {
            errors.push("Max map entries must be greater than 0".to_string());
        } else if self.max_map_entries > i32::MAX as usize {
            errors.push(format!(
                "Max map entries too large: {} (wire counts are i32)",
                self.max_map_entries
            ));
        }

        if self.max_field_len == 0 {
            errors.push("Max field length must be greater than 0".to_string());
        } else if self.max_field_len > MAX_PAYLOAD_SIZE {
            errors.push(format!(
                "Max field length too large: {} bytes (cannot exceed max payload size {})",
                self.max_field_len, MAX_PAYLOAD_SIZE
            ));
        }

        errors
    }
}

/// Transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Whether to seal payloads with the channel key
    pub seal_payloads: bool,

    /// Maximum time to wait for an incoming record
    #[serde(with = "duration_serde")]
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            seal_payloads: SEAL_PAYLOADS,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Validate transport configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.read_timeout.as_millis() < 10 {
            errors.push("Read timeout too short (minimum: 10ms)".to_string());
        } else if self.read_timeout.as_secs() > 3600 {
            errors.push("Read timeout too long (maximum: 1 hour)".to_string());
        }

        if !self.seal_payloads {
            errors.push(
                "WARNING: Payload sealing is disabled - passphrases travel in the clear"
                    .to_string(),
            );
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("crypto-input-parcel"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_parse_env_values() {
        assert_eq!(parse_env::<usize>("X", " 42 ").unwrap(), 42);
        assert!(parse_env::<bool>("X", "true").unwrap());
        assert!(matches!(
            parse_env::<u64>("X", "soon"),
            Err(ParcelError::ConfigError(msg)) if msg.contains("X")
        ));
    }

    #[test]
    fn test_limits_map_to_decode_limits() {
        let limits = LimitsConfig {
            max_map_entries: 3,
            max_field_len: 9,
        };
        assert_eq!(
            limits.decode_limits(),
            DecodeLimits {
                max_map_entries: 3,
                max_field_len: 9
            }
        );
    }
}
