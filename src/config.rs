//! Environment configuration, read once before the device is prepared.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::backend::{CaptureMode, OpenOptions};
use crate::mode::Mode;
use crate::settings::{
    FRAMERATE_DEFAULT, PREVIEW_HEIGHT_PHOTO, PREVIEW_HEIGHT_VIDEO, PREVIEW_WIDTH,
    SNAPSHOT_DEFAULT, VIDEO_DEFAULT,
};

/// Selects the initial capture mode: `"0"` photo, `"1"` video.
pub const ENV_INIT_MODE: &str = "AIRCAM_INIT_CAMERA_MODE";
/// Filesystem prefix under which captured media lands.
pub const ENV_STORE_PREFIX: &str = "AIRCAM_STORAGE_PREFIX";
/// Overrides the primary camera module path.
pub const ENV_PRIMARY_MODULE: &str = "AIRCAM_PRIMARY_MODULE";
/// Overrides the thermal extension module path.
pub const ENV_THERMAL_MODULE: &str = "AIRCAM_THERMAL_MODULE";

/// Default module names, resolved through the platform loader search path.
pub const DEFAULT_PRIMARY_MODULE: &str = "libpayload_camera.so";
pub const DEFAULT_THERMAL_MODULE: &str = "libthermal_extension.so";

/// Startup configuration for the device facade.
#[derive(Debug, Clone)]
pub struct Config {
    pub primary_module: PathBuf,
    pub thermal_module: PathBuf,
    pub initial_mode: Mode,
    pub store_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_module: PathBuf::from(DEFAULT_PRIMARY_MODULE),
            thermal_module: PathBuf::from(DEFAULT_THERMAL_MODULE),
            initial_mode: Mode::Photo,
            store_prefix: None,
        }
    }
}

impl Config {
    /// Read the process environment once.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` feeds the real
    /// environment through here.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let initial_mode = match lookup(ENV_INIT_MODE).as_deref() {
            None | Some("0") => Mode::Photo,
            Some("1") => Mode::Video,
            Some(other) => {
                warn!(value = other, "unrecognized initial mode override, using photo");
                Mode::Photo
            }
        };

        let store_prefix = lookup(ENV_STORE_PREFIX).filter(|prefix| !prefix.is_empty());
        if store_prefix.is_none() {
            warn!("{ENV_STORE_PREFIX} not set; captured media keeps the vendor default location");
        }

        let primary_module = lookup(ENV_PRIMARY_MODULE)
            .filter(|path| !path.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_PRIMARY_MODULE), PathBuf::from);
        let thermal_module = lookup(ENV_THERMAL_MODULE)
            .filter(|path| !path.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_THERMAL_MODULE), PathBuf::from);

        Self {
            primary_module,
            thermal_module,
            initial_mode,
            store_prefix,
        }
    }

    /// Apply command-line module overrides on top of the environment.
    #[must_use]
    pub fn with_modules(mut self, primary: Option<PathBuf>, thermal: Option<PathBuf>) -> Self {
        if let Some(path) = primary {
            self.primary_module = path;
        }
        if let Some(path) = thermal {
            self.thermal_module = path;
        }
        self
    }

    /// The open options handed to the primary backend at load time.
    #[must_use]
    pub fn open_options(&self) -> OpenOptions {
        let mode = self.initial_mode.capture().unwrap_or(CaptureMode::Still);
        let preview_height = match mode {
            CaptureMode::Still => PREVIEW_HEIGHT_PHOTO,
            CaptureMode::Movie => PREVIEW_HEIGHT_VIDEO,
        };
        OpenOptions {
            mode,
            preview_width: PREVIEW_WIDTH,
            preview_height,
            snapshot_width: SNAPSHOT_DEFAULT.0,
            snapshot_height: SNAPSHOT_DEFAULT.1,
            video_width: VIDEO_DEFAULT.0,
            video_height: VIDEO_DEFAULT.1,
            framerate: FRAMERATE_DEFAULT,
            store_prefix: self.store_prefix.clone(),
        }
    }

    /// Media folder reported in status; empty when no prefix is configured.
    #[must_use]
    pub fn media_folder(&self) -> &str {
        self.store_prefix.as_deref().unwrap_or("")
    }
}
