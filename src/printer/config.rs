//! # Printer Configuration
//!
//! This module defines the serial link settings for talking to a label printer.
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | Port | `COM5` (Windows), `/dev/ttyUSB0` (elsewhere) |
//! | Baud rate | 9600 |
//! | Read timeout | 10000 ms |
//! | Write timeout | 10000 ms |
//!
//! ## Configuration File
//!
//! Settings can be loaded from a TOML file. Missing keys keep their defaults:
//!
//! ```toml
//! port = "COM3"
//! baud_rate = 19200
//! read_timeout_ms = 5000
//! ```
//!
//! ## Usage
//!
//! ```
//! use labelbridge::printer::PrinterConfig;
//!
//! let config = PrinterConfig::default();
//! assert_eq!(config.read_timeout_ms, 10_000);
//! assert_eq!(config.list_timeout().as_millis(), 20_000);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Default read and write timeout, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default baud rate of the LP-50 serial interface.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default port name for the current platform.
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM5";

/// Default port name for the current platform.
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// # Printer Configuration
///
/// Serial link settings for one printer.
///
/// ## Timeouts
///
/// - **read_timeout_ms**: longest a single byte read may block, and how long
///   the reader waits for each further line of a multi-line response
/// - **write_timeout_ms**: longest a single line write may block
///
/// The form listing waits twice the read timeout for its first byte, since
/// the printer may have many forms to enumerate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Serial port name, matched case-insensitively
    pub port: String,

    /// Baud rate
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,

    /// Write timeout in milliseconds
    pub write_timeout_ms: u64,
}

impl PrinterConfig {
    /// Load settings from a TOML file.
    ///
    /// ## Errors
    ///
    /// Returns [`LabelError::Config`] if the file can't be read or parsed, or
    /// if a setting is out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LabelError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| LabelError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, LabelError> {
        let config: Self =
            toml::from_str(content).map_err(|e| LabelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.port.trim().is_empty() {
            return Err(LabelError::Config("port must not be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(LabelError::Config("baud_rate must be positive".to_string()));
        }
        if self.read_timeout_ms == 0 || self.write_timeout_ms == 0 {
            return Err(LabelError::Config("timeouts must be positive".to_string()));
        }
        Ok(())
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[inline]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Wait budget for the form listing: twice the read timeout.
    #[inline]
    pub fn list_timeout(&self) -> Duration {
        self.read_timeout() * 2
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PrinterConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.read_timeout(), Duration::from_secs(10));
        assert_eq!(config.write_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_list_timeout_is_double_read_timeout() {
        let config = PrinterConfig {
            read_timeout_ms: 1500,
            ..Default::default()
        };
        assert_eq!(config.list_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PrinterConfig::from_toml("port = \"COM3\"\nbaud_rate = 19200\n").unwrap();
        assert_eq!(config.port, "COM3");
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.read_timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(PrinterConfig::from_toml("").unwrap(), PrinterConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = PrinterConfig::from_toml("read_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, LabelError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(PrinterConfig::from_toml("baud_rate = \"fast\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelbridge.toml");
        fs::write(&path, "port = \"/dev/ttyS1\"\nwrite_timeout_ms = 2000\n").unwrap();

        let config = PrinterConfig::load(&path).unwrap();
        assert_eq!(config.port, "/dev/ttyS1");
        assert_eq!(config.write_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PrinterConfig::load("/nonexistent/labelbridge.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
