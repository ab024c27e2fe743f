//! Camera operating mode.

use serde::Serialize;

use crate::backend::CaptureMode;

/// The camera's operating state.
///
/// `Unknown` exists only before the device has been prepared; after a
/// successful [`prepare`](crate::device::Camera::prepare) the camera is
/// always in `Photo` or `Video`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Unknown,
    Photo,
    Video,
}

impl Mode {
    /// Option id stored in the settings registry for this mode.
    #[must_use]
    pub const fn option_id(self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Photo => "0",
            Self::Video => "1",
        }
    }

    /// Parses a registry option id back into a mode.
    #[must_use]
    pub fn from_option_id(option_id: &str) -> Option<Self> {
        match option_id {
            "0" => Some(Self::Photo),
            "1" => Some(Self::Video),
            _ => None,
        }
    }

    /// The backend capture mode for this mode; `None` for `Unknown`, which
    /// is never a legal switch target.
    #[must_use]
    pub const fn capture(self) -> Option<CaptureMode> {
        match self {
            Self::Unknown => None,
            Self::Photo => Some(CaptureMode::Still),
            Self::Video => Some(CaptureMode::Movie),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Photo => "photo",
            Self::Video => "video",
        };
        f.write_str(name)
    }
}

impl From<CaptureMode> for Mode {
    fn from(mode: CaptureMode) -> Self {
        match mode {
            CaptureMode::Still => Self::Photo,
            CaptureMode::Movie => Self::Video,
        }
    }
}
