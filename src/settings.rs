//! Settings registry and the codec tables behind the setting dispatch.
//!
//! The registry is the authoritative cache of currently-selected options,
//! seeded once at prepare time and mutated only by successful set calls. The
//! codecs translate between protocol option ids and the raw units the
//! backend speaks (kelvin, seconds, pixel geometry).

use serde::Serialize;
use tracing::warn;

// === Setting identifiers ===

/// Capture mode (photo/video).
pub const CAM_MODE: &str = "CAM_MODE";
/// Preview/display routing.
pub const CAM_DISPLAY_MODE: &str = "CAM_DISPLAY_MODE";
/// Still-capture resolution.
pub const CAM_PHOTO_RES: &str = "CAM_PHOTO_RES";
/// White balance.
pub const CAM_WBMODE: &str = "CAM_WBMODE";
/// Exposure mode (auto/manual); acknowledged but never forwarded.
pub const CAM_EXPMODE: &str = "CAM_EXPMODE";
/// Exposure compensation value.
pub const CAM_EV: &str = "CAM_EV";
/// ISO sensitivity.
pub const CAM_ISO: &str = "CAM_ISO";
/// Shutter speed.
pub const CAM_SHUTTERSPD: &str = "CAM_SHUTTERSPD";
/// Video container format; acknowledged but never forwarded.
pub const CAM_VIDFMT: &str = "CAM_VIDFMT";
/// Video resolution and framerate, as one option.
pub const CAM_VIDRES: &str = "CAM_VIDRES";
/// Thermal color palette; present only when the thermal module loaded.
pub const IRCAM_PALETTE: &str = "IRCAM_PALETTE";
/// Thermal flat-field correction trigger; present only with the thermal module.
pub const IRCAM_FFC: &str = "IRCAM_FFC";

/// Reset targets, in apply order. `CAM_PHOTO_RES` is deliberately absent:
/// snapshot resolution survives a settings reset.
pub const RESET_DEFAULTS: &[(&str, &str)] = &[
    (CAM_MODE, "0"),
    (CAM_DISPLAY_MODE, "0"),
    (CAM_WBMODE, "0"),
    (CAM_EXPMODE, "0"),
    (CAM_EV, "0.0"),
    (CAM_ISO, "125"),
    (CAM_SHUTTERSPD, "1/100"),
    (CAM_VIDFMT, "1"),
    (CAM_VIDRES, "0"),
];

// === Fixed geometry ===

/// Preview stream width; height follows the active capture aspect.
pub const PREVIEW_WIDTH: u32 = 1920;
/// Preview height while in photo mode (4:3).
pub const PREVIEW_HEIGHT_PHOTO: u32 = 1440;
/// Preview height while in video mode (16:9).
pub const PREVIEW_HEIGHT_VIDEO: u32 = 1080;
/// Snapshot geometry handed to the backend on open (option `"1"`).
pub const SNAPSHOT_DEFAULT: (u32, u32) = (4624, 3472);
/// Movie pipeline defaults handed to the backend on open.
pub const VIDEO_DEFAULT: (u32, u32) = (3840, 2160);
pub const FRAMERATE_DEFAULT: u32 = 30;

// === Data model ===

/// One legal value for a setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingOption {
    pub option_id: String,
    pub option_description: String,
}

/// A named, currently-selected (id, option) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Setting {
    pub setting_id: String,
    pub option: SettingOption,
    pub is_range: bool,
}

impl Setting {
    /// Build a plain cache entry; descriptions and ranges come from the
    /// camera definition file, not from here.
    #[must_use]
    pub fn new(setting_id: &str, option_id: &str) -> Self {
        Self {
            setting_id: setting_id.to_string(),
            option: SettingOption {
                option_id: option_id.to_string(),
                option_description: String::new(),
            },
            is_range: false,
        }
    }
}

/// The catalog of legal values for one setting (read-only view).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingOptions {
    pub setting_id: String,
    pub setting_description: String,
    pub options: Vec<SettingOption>,
    pub is_range: bool,
}

// === Registry ===

/// Ordered cache of current settings.
///
/// Holds at most one entry per setting id; iteration order is first-seen
/// order, which matches the seeding order at prepare time.
#[derive(Debug, Default)]
pub struct SettingsRegistry {
    entries: Vec<Setting>,
}

impl SettingsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry or overwrite an existing one, preserving order.
    pub fn upsert(&mut self, setting_id: &str, option_id: &str) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.setting_id == setting_id)
        {
            entry.option.option_id = option_id.to_string();
        } else {
            self.entries.push(Setting::new(setting_id, option_id));
        }
    }

    /// Current entry for a setting id.
    #[must_use]
    pub fn get(&self, setting_id: &str) -> Option<&Setting> {
        self.entries
            .iter()
            .find(|entry| entry.setting_id == setting_id)
    }

    /// Current option id for a setting id.
    #[must_use]
    pub fn option_id(&self, setting_id: &str) -> Option<&str> {
        self.get(setting_id)
            .map(|entry| entry.option.option_id.as_str())
    }

    /// All entries in seeding order.
    #[must_use]
    pub fn all(&self) -> &[Setting] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Called when the device is re-prepared so entries
    /// from a previous hardware generation cannot linger.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// === Codecs ===

/// Exposure compensation formatted the way the protocol carries it.
#[must_use]
pub fn exposure_option(ev: f32) -> String {
    format!("{ev:.1}")
}

/// Parses a protocol exposure option back to the backend unit.
#[must_use]
pub fn parse_exposure_option(option_id: &str) -> Option<f32> {
    option_id.parse::<f32>().ok()
}

/// Shutter speed as the protocol fraction string: sub-second exposures
/// become `1/n`, one second and above keep one fractional digit.
#[must_use]
pub fn shutter_option(seconds: f32) -> String {
    if seconds <= 0.0 {
        // Hardware glitch; report the reset default instead of nonsense.
        return "1/100".to_string();
    }
    if seconds >= 1.0 {
        format!("{seconds:.1}")
    } else {
        let denominator = (1.0 / seconds).round() as u32;
        format!("1/{denominator}")
    }
}

/// Parses a shutter option (`1/100` or plain seconds) to seconds.
#[must_use]
pub fn parse_shutter_option(option_id: &str) -> Option<f32> {
    if let Some((numerator, denominator)) = option_id.split_once('/') {
        let numerator = numerator.trim().parse::<f32>().ok()?;
        let denominator = denominator.trim().parse::<f32>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }
    option_id.parse::<f32>().ok().filter(|secs| *secs > 0.0)
}

/// White balance option id → kelvin; `0` kelvin means automatic.
#[must_use]
pub fn white_balance_kelvin(option_id: &str) -> Option<u32> {
    match option_id {
        "0" => Some(0),
        "1" => Some(5500),
        "2" => Some(6500),
        "3" => Some(7500),
        "4" => Some(2700),
        "5" => Some(4000),
        _ => None,
    }
}

/// Kelvin → white balance option id, for seeding from a hardware query.
#[must_use]
pub fn white_balance_option(kelvin: u32) -> Option<&'static str> {
    match kelvin {
        0 => Some("0"),
        5500 => Some("1"),
        6500 => Some("2"),
        7500 => Some("3"),
        2700 => Some("4"),
        4000 => Some("5"),
        _ => None,
    }
}

/// Snapshot resolution option id → pixel geometry.
#[must_use]
pub fn snapshot_resolution(option_id: &str) -> Option<(u32, u32)> {
    match option_id {
        "0" => Some((9248, 6944)),
        "1" => Some((4624, 3472)),
        _ => None,
    }
}

/// Pixel geometry → snapshot option id.
#[must_use]
pub fn snapshot_option(width: u32, height: u32) -> Option<&'static str> {
    match (width, height) {
        (9248, 6944) => Some("0"),
        (4624, 3472) => Some("1"),
        _ => None,
    }
}

/// The four supported resolution/framerate combinations, indexed by their
/// option ids `"0"`..`"3"`.
const VIDEO_MATRIX: [(u32, u32, u32); 4] = [
    (3840, 2160, 60),
    (3840, 2160, 30),
    (1920, 1080, 60),
    (1920, 1080, 30),
];

/// Video option id → (width, height, framerate).
#[must_use]
pub fn video_matrix_entry(option_id: &str) -> Option<(u32, u32, u32)> {
    let index = option_id.parse::<usize>().ok()?;
    VIDEO_MATRIX.get(index).copied()
}

/// Hardware (width, height, framerate) → video option id. Combinations
/// outside the matrix report `"0"` with a warning rather than an error.
#[must_use]
pub fn video_option(width: u32, height: u32, framerate: u32) -> &'static str {
    match VIDEO_MATRIX
        .iter()
        .position(|entry| *entry == (width, height, framerate))
    {
        Some(0) => "0",
        Some(1) => "1",
        Some(2) => "2",
        Some(3) => "3",
        _ => {
            warn!(
                width,
                height, framerate, "video resolution outside the supported matrix"
            );
            "0"
        }
    }
}

/// Display/preview routing option id → backend routing target.
#[must_use]
pub fn display_target(option_id: &str) -> Option<i32> {
    let target = option_id.parse::<i32>().ok()?;
    (0..=3).contains(&target).then_some(target)
}

/// Backend routing target → display option id.
#[must_use]
pub fn display_option(target: i32) -> Option<&'static str> {
    match target {
        0 => Some("0"),
        1 => Some("1"),
        2 => Some("2"),
        3 => Some("3"),
        _ => None,
    }
}
