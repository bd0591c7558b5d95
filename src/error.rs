//! # Error Types
//!
//! Custom error types for Pico Raspberry using `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Pico Raspberry
#[derive(Debug, Error)]
pub enum PicoError {
    /// Config file does not exist
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Config document is not valid JSON/TOML
    #[error("config parse error: {0}")]
    Parse(String),

    /// Config document parsed but `gpio`/`pico` have the wrong shape
    #[error("config shape error: {0}")]
    Shape(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line id outside the numbering supported by the GPIO facility
    #[error("invalid GPIO line {0}")]
    InvalidLine(u32),

    /// Line could not be claimed (already in use, permission denied...)
    #[error("failed to claim GPIO line {line}: {reason}")]
    LineClaim { line: u32, reason: String },

    /// Two buttons resolved to the same line
    #[error("GPIO line {line} is mapped to both '{first}' and '{second}'")]
    DuplicateLine {
        line: u32,
        first: &'static str,
        second: &'static str,
    },

    /// Key identifier the injection facility cannot express
    #[error("unknown key identifier '{0}'")]
    UnknownKey(String),

    /// GPIO facility could not be opened
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// Key injection facility could not be opened
    #[error("key injection error: {0}")]
    KeyInjection(String),
}

impl PicoError {
    /// Whether this error came from loading the config document.
    ///
    /// Config errors are recovered at startup by falling back to defaults;
    /// every other kind aborts startup.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PicoError::ConfigNotFound(_)
                | PicoError::Parse(_)
                | PicoError::Shape(_)
                | PicoError::Io(_)
        )
    }
}

/// Result type alias for Pico Raspberry
pub type Result<T> = std::result::Result<T, PicoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_recoverable() {
        assert!(PicoError::ConfigNotFound(PathBuf::from("/nope")).is_config_error());
        assert!(PicoError::Parse("bad".to_string()).is_config_error());
        assert!(PicoError::Shape("bad".to_string()).is_config_error());
        assert!(PicoError::Io(std::io::Error::other("boom")).is_config_error());
    }

    #[test]
    fn test_binding_errors_are_fatal() {
        assert!(!PicoError::InvalidLine(300).is_config_error());
        assert!(!PicoError::LineClaim { line: 4, reason: "busy".to_string() }.is_config_error());
        assert!(!PicoError::UnknownKey("hyper".to_string()).is_config_error());
    }

    #[test]
    fn test_error_messages() {
        let err = PicoError::DuplicateLine { line: 3, first: "up", second: "down" };
        assert_eq!(err.to_string(), "GPIO line 3 is mapped to both 'up' and 'down'");

        let err = PicoError::ConfigNotFound(PathBuf::from("/usr/local/etc/pico-raspberry.json"));
        assert!(err.to_string().contains("/usr/local/etc/pico-raspberry.json"));
    }
}
