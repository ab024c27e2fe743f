//! Uniform outcome vocabulary reported to the camera controller.

use serde::Serialize;

use crate::backend::{BackendError, ThermalError};

/// Outcome of one controller-visible camera operation.
///
/// The two hardware backends each speak their own result dialect; everything
/// is translated into this vocabulary before it reaches the caller, so the
/// controller never sees a backend-specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Operation completed.
    Success,
    /// Operation was accepted and is still running.
    InProgress,
    /// Device is busy with another operation.
    Busy,
    /// Device refused the operation.
    Denied,
    /// Operation failed.
    Error,
    /// Backend did not answer in time.
    Timeout,
    /// Argument outside the accepted set.
    WrongArgument,
    /// No backend instance is loaded.
    NoSystem,
    /// Failure with no further classification.
    Unknown,
    /// Operation has no backend equivalent in this payload.
    ProtocolUnsupported,
}

impl Outcome {
    /// Returns true when the controller should treat the operation as
    /// successful (completed or accepted-and-running).
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::InProgress)
    }

    /// Uppercase label used by the diagnostic CLI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::InProgress => "IN_PROGRESS",
            Self::Busy => "BUSY",
            Self::Denied => "DENIED",
            Self::Error => "ERROR",
            Self::Timeout => "TIMEOUT",
            Self::WrongArgument => "WRONG_ARGUMENT",
            Self::NoSystem => "NO_SYSTEM",
            Self::Unknown => "UNKNOWN",
            Self::ProtocolUnsupported => "PROTOCOL_UNSUPPORTED",
        }
    }

    /// Collapses a primary-backend call into an outcome.
    #[must_use]
    pub fn from_backend(result: Result<(), BackendError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => err.into(),
        }
    }

    /// Collapses a thermal-backend call into an outcome.
    #[must_use]
    pub fn from_thermal(result: Result<(), ThermalError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => err.into(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<BackendError> for Outcome {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Busy => Self::Busy,
            BackendError::Denied => Self::Denied,
            BackendError::Fault => Self::Error,
            BackendError::Timeout => Self::Timeout,
            BackendError::InvalidArgument => Self::WrongArgument,
            BackendError::NoDevice => Self::NoSystem,
            BackendError::InProgress => Self::InProgress,
            BackendError::Unknown(_) => Self::Unknown,
        }
    }
}

impl From<ThermalError> for Outcome {
    /// The thermal extension reports raw status words with no finer
    /// classification, so every failure maps to `Error`.
    fn from(_: ThermalError) -> Self {
        Self::Error
    }
}
