//! Error types for payload camera operations.

use thiserror::Error;

/// Primary error type for camera initialization and CLI operations.
///
/// Per-call hardware failures are not represented here; those travel through
/// [`crate::outcome::Outcome`] so the controller sees the protocol vocabulary.
#[derive(Error, Debug)]
pub enum CamError {
    // Backend module errors
    #[error("Failed to load backend module '{path}': {reason}")]
    ModuleLoad { path: String, reason: String },

    #[error("Backend module '{module}' has no factory symbol '{symbol}'")]
    SymbolMissing { symbol: String, module: String },

    #[error("Backend factory in '{module}' returned no instance")]
    BackendInit { module: String },

    // Input errors
    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl CamError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::ModuleLoad { .. } | Self::InvalidTimestamp { .. })
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ModuleLoad { .. } => {
                Some("Point AIRCAM_PRIMARY_MODULE (or --module) at the vendor camera module")
            }
            Self::SymbolMissing { .. } => {
                Some("The module is not a payload camera backend; check the module path")
            }
            Self::InvalidTimestamp { .. } => {
                Some("Use an RFC 3339 timestamp, e.g. 2026-01-01T12:00:00Z")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using CamError.
pub type Result<T> = std::result::Result<T, CamError>;
