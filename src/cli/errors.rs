//! CLI error types.

use std::fmt;

/// CLI error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file problem.
    ConfigError,
    /// Target already initialized.
    AlreadyInitialized,
    /// Server failed to boot or crashed.
    BootFailed,
    /// stdin/stdout failure.
    IoError,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            CliErrorCode::ConfigError => "SLAB_CLI_CONFIG_ERROR",
            CliErrorCode::AlreadyInitialized => "SLAB_CLI_ALREADY_INITIALIZED",
            CliErrorCode::BootFailed => "SLAB_CLI_BOOT_FAILED",
            CliErrorCode::IoError => "SLAB_CLI_IO_ERROR",
        }
    }
}

/// CLI error.
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, message)
    }

    pub fn already_initialized(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::AlreadyInitialized, message)
    }

    pub fn boot_failed(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, message)
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, message)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CliErrorCode::ConfigError.code(), "SLAB_CLI_CONFIG_ERROR");
        assert_eq!(
            CliErrorCode::AlreadyInitialized.code(),
            "SLAB_CLI_ALREADY_INITIALIZED"
        );
        assert_eq!(CliErrorCode::BootFailed.code(), "SLAB_CLI_BOOT_FAILED");
    }

    #[test]
    fn test_display() {
        let err = CliError::config_error("missing file");
        let rendered = format!("{}", err);
        assert!(rendered.contains("SLAB_CLI_CONFIG_ERROR"));
        assert!(rendered.contains("missing file"));
    }
}
