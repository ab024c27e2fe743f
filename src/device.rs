//! The camera device facade.
//!
//! [`Camera`] is the single object the RPC adapter talks to. It composes the
//! backend loader, the settings registry, the mode state machine, and the
//! storage snapshot cell, and translates every backend result into the
//! uniform [`Outcome`] vocabulary before it leaves the facade.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendInformation, BackendResult, BoxedBackend, BoxedThermal, CameraBackend};
use crate::config::Config;
use crate::error::Result;
use crate::loader::BackendLoader;
use crate::mode::Mode;
use crate::outcome::Outcome;
use crate::settings::{self, Setting, SettingOptions, SettingsRegistry};
use crate::status::{RecordingState, Status, StorageCell};

/// Fixed endpoint of the preview stream; the encoder pipeline behind it is
/// entirely the primary backend's business.
const STREAM_URI: &str = "rtsp://192.168.251.1/live";

// === Controller-facing records ===

/// Capability advertised to the controller. The set is a property of the
/// payload, not of the loaded backend, so it never varies at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    CaptureImage,
    CaptureVideo,
    HasModes,
    HasVideoStream,
}

/// Device description reported to the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Information {
    pub vendor_name: String,
    pub model_name: String,
    pub firmware_version: String,
    pub focal_length_mm: f32,
    pub horizontal_sensor_size_mm: f32,
    pub vertical_sensor_size_mm: f32,
    pub horizontal_resolution_px: u32,
    pub vertical_resolution_px: u32,
    pub lens_id: u32,
    pub definition_file_version: u32,
    pub definition_file_uri: String,
    pub capabilities: Vec<Capability>,
}

impl Information {
    const CAPABILITIES: [Capability; 4] = [
        Capability::CaptureImage,
        Capability::CaptureVideo,
        Capability::HasModes,
        Capability::HasVideoStream,
    ];

    fn from_backend(info: BackendInformation) -> Self {
        Self {
            vendor_name: info.vendor_name,
            model_name: info.model_name,
            firmware_version: info.firmware_version,
            focal_length_mm: info.focal_length_mm,
            horizontal_sensor_size_mm: info.horizontal_sensor_size_mm,
            vertical_sensor_size_mm: info.vertical_sensor_size_mm,
            horizontal_resolution_px: info.horizontal_resolution_px,
            vertical_resolution_px: info.vertical_resolution_px,
            lens_id: info.lens_id,
            definition_file_version: info.definition_file_version,
            definition_file_uri: info.definition_file_uri,
            capabilities: Self::CAPABILITIES.to_vec(),
        }
    }

    /// Placeholder record when the backend cannot be queried. Capabilities
    /// are still advertised; they do not depend on the query.
    fn unknown() -> Self {
        Self {
            vendor_name: "Unknown".to_string(),
            model_name: "Unknown".to_string(),
            firmware_version: "0.0.0".to_string(),
            focal_length_mm: 0.0,
            horizontal_sensor_size_mm: 0.0,
            vertical_sensor_size_mm: 0.0,
            horizontal_resolution_px: 0,
            vertical_resolution_px: 0,
            lens_id: 0,
            definition_file_version: 0,
            definition_file_uri: String::new(),
            capabilities: Self::CAPABILITIES.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    NotRunning,
    InProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSpectrum {
    Unknown,
    VisibleLight,
    Infrared,
}

/// Description of the preview video stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStreamInfo {
    pub stream_id: u8,
    pub frame_rate_hz: f32,
    pub horizontal_resolution_px: u32,
    pub vertical_resolution_px: u32,
    pub bit_rate_bps: u32,
    pub rotation_deg: u16,
    pub horizontal_fov_deg: u16,
    pub uri: String,
    pub status: StreamStatus,
    pub spectrum: StreamSpectrum,
}

/// Which captures a photo listing should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotosRange {
    All,
    SinceConnection,
}

/// One archived capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureInfo {
    pub index: i32,
    pub time_utc_us: u64,
    pub is_success: bool,
    pub file_url: String,
}

// === The facade ===

/// The payload camera device.
///
/// All methods are synchronous; callers needing concurrency wrap the device
/// in their own synchronization, which is why none of the operations hold
/// internal locks across backend calls.
pub struct Camera {
    loader: BackendLoader,
    registry: SettingsRegistry,
    mode: Mode,
    recording: RecordingState,
    storage: StorageCell,
    config: Config,
    framerate: u32,
}

impl Camera {
    /// A device that will load its backends from the configured module
    /// paths on [`prepare`](Self::prepare).
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_loader(BackendLoader::new(), config)
    }

    /// A device over already-built backend instances. Used by tests; the
    /// prepare flow is identical apart from skipping the platform loader.
    #[must_use]
    pub fn with_backends(
        primary: BoxedBackend,
        thermal: Option<BoxedThermal>,
        config: Config,
    ) -> Self {
        Self::with_loader(BackendLoader::with_instances(primary, thermal), config)
    }

    fn with_loader(loader: BackendLoader, config: Config) -> Self {
        Self {
            loader,
            registry: SettingsRegistry::new(),
            mode: Mode::Unknown,
            recording: RecordingState::default(),
            storage: StorageCell::new(),
            config,
            framerate: settings::FRAMERATE_DEFAULT,
        }
    }

    /// Bring the device up: load the mandatory primary backend, adopt the
    /// configured initial mode, seed the settings registry, then attempt the
    /// optional thermal extension.
    pub fn prepare(&mut self) -> Outcome {
        match self.try_prepare() {
            Ok(()) => Outcome::Success,
            Err(err) => {
                error!(%err, "camera preparation failed");
                Outcome::Error
            }
        }
    }

    /// The same bring-up with the underlying error preserved, for callers
    /// that report diagnostics rather than protocol outcomes.
    pub fn try_prepare(&mut self) -> Result<()> {
        self.registry.clear();
        self.recording.stop();
        self.loader
            .load_primary(&self.config, self.storage.callback())?;
        self.mode = self.config.initial_mode;
        self.framerate = settings::FRAMERATE_DEFAULT;
        self.seed_primary_settings();
        if self.loader.load_thermal(&self.config) {
            self.seed_thermal_settings();
        }
        info!(
            mode = %self.mode,
            settings = self.registry.len(),
            thermal = self.loader.has_thermal(),
            "camera device ready"
        );
        Ok(())
    }

    /// Query-seed the registry. Identity values come from constants, tunable
    /// values from the hardware, each with its own fallback when the query
    /// fails.
    fn seed_primary_settings(&mut self) {
        let Some(backend) = self.loader.primary_mut() else {
            return;
        };

        let display = backend
            .preview_target()
            .ok()
            .and_then(settings::display_option)
            .unwrap_or("0");
        let white_balance = backend
            .white_balance()
            .ok()
            .and_then(settings::white_balance_option)
            .unwrap_or("0");
        let exposure = backend
            .exposure_value()
            .map_or_else(|_| "0.0".to_string(), settings::exposure_option);
        let iso = backend
            .iso()
            .map_or_else(|_| "125".to_string(), |iso| iso.to_string());
        let shutter = backend
            .shutter_speed()
            .map_or_else(|_| "1/100".to_string(), settings::shutter_option);
        let video = match (backend.video_resolution(), backend.framerate()) {
            (Ok((width, height)), Ok(fps)) => {
                self.framerate = fps;
                settings::video_option(width, height, fps)
            }
            _ => "0",
        };

        self.registry.upsert(settings::CAM_MODE, self.mode.option_id());
        self.registry.upsert(settings::CAM_DISPLAY_MODE, display);
        self.registry.upsert(settings::CAM_PHOTO_RES, "1");
        self.registry.upsert(settings::CAM_WBMODE, white_balance);
        self.registry.upsert(settings::CAM_EXPMODE, "0");
        self.registry.upsert(settings::CAM_EV, &exposure);
        self.registry.upsert(settings::CAM_ISO, &iso);
        self.registry.upsert(settings::CAM_SHUTTERSPD, &shutter);
        self.registry.upsert(settings::CAM_VIDFMT, "1");
        self.registry.upsert(settings::CAM_VIDRES, video);
    }

    fn seed_thermal_settings(&mut self) {
        let Some(thermal) = self.loader.thermal_mut() else {
            return;
        };
        let palette = thermal
            .color_mode()
            .map_or_else(|_| "0".to_string(), |mode| mode.to_string());
        self.registry.upsert(settings::IRCAM_PALETTE, &palette);
        self.registry.upsert(settings::IRCAM_FFC, "0");
    }

    /// Release both backends. The device returns to its unprepared state
    /// and every subsequent operation reports `NoSystem`.
    pub fn close(&mut self) {
        self.loader.close();
        self.recording.stop();
        self.mode = Mode::Unknown;
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.loader.has_primary()
    }

    #[must_use]
    pub fn thermal_available(&self) -> bool {
        self.loader.has_thermal()
    }

    // === Capture ===

    pub fn take_photo(&mut self) -> Outcome {
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(backend.take_photo());
        if outcome.is_success() {
            debug!("photo capture triggered");
        } else {
            warn!(%outcome, "photo capture failed");
        }
        outcome
    }

    pub fn start_video(&mut self) -> Outcome {
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(backend.start_video());
        if outcome.is_success() {
            self.recording.start();
            info!("video recording started");
        } else {
            warn!(%outcome, "video start failed");
        }
        outcome
    }

    pub fn stop_video(&mut self) -> Outcome {
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(backend.stop_video());
        if outcome.is_success() {
            self.recording.stop();
            info!("video recording stopped");
        } else {
            warn!(%outcome, "video stop failed");
        }
        outcome
    }

    /// Transactional mode switch: the cached mode and the `CAM_MODE` entry
    /// change only after the backend confirms, so a rejected switch leaves
    /// the previous mode fully intact. Switching to the active mode is a
    /// no-op success without a backend call.
    pub fn set_mode(&mut self, target: Mode) -> Outcome {
        let Some(capture) = target.capture() else {
            warn!("mode switch target must be photo or video");
            return Outcome::WrongArgument;
        };
        if target == self.mode {
            debug!(mode = %target, "mode already active");
            return Outcome::Success;
        }
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(backend.set_capture_mode(capture));
        if outcome == Outcome::Success {
            self.mode = target;
            self.registry.upsert(settings::CAM_MODE, target.option_id());
            info!(mode = %target, "capture mode switched");
        } else {
            warn!(mode = %target, %outcome, "capture mode switch failed");
        }
        outcome
    }

    // === Settings ===

    #[must_use]
    pub fn current_settings(&self) -> Vec<Setting> {
        self.registry.all().to_vec()
    }

    /// The option catalogs live in the camera definition file served to the
    /// controller, so the device itself has none to offer.
    #[must_use]
    pub fn possible_setting_options(&self) -> Vec<SettingOptions> {
        Vec::new()
    }

    /// Read one setting from the registry cache; no backend round-trip.
    #[must_use]
    pub fn get_setting(&self, setting_id: &str) -> (Outcome, Setting) {
        match self.registry.get(setting_id) {
            Some(entry) => (Outcome::Success, entry.clone()),
            None => {
                debug!(setting_id, "setting not in registry");
                (Outcome::WrongArgument, Setting::new(setting_id, ""))
            }
        }
    }

    /// Apply one setting. The registry entry is updated only after the
    /// owning backend confirms the new value; rejected or unknown options
    /// leave the cache untouched.
    pub fn set_setting(&mut self, setting_id: &str, option_id: &str) -> Outcome {
        if !self.loader.has_primary() {
            return Outcome::NoSystem;
        }
        debug!(setting_id, option_id, "set setting");
        match setting_id {
            settings::CAM_MODE => match Mode::from_option_id(option_id) {
                Some(mode) => self.set_mode(mode),
                None => self.reject_option(setting_id, option_id),
            },
            settings::CAM_DISPLAY_MODE => match settings::display_target(option_id) {
                Some(target) => self.apply_primary(setting_id, option_id, |backend| {
                    backend.set_preview_target(target)
                }),
                None => self.reject_option(setting_id, option_id),
            },
            settings::CAM_PHOTO_RES => match settings::snapshot_resolution(option_id) {
                Some((width, height)) => self.apply_primary(setting_id, option_id, |backend| {
                    backend.set_snapshot_resolution(width, height)
                }),
                None => self.reject_option(setting_id, option_id),
            },
            settings::CAM_WBMODE => match settings::white_balance_kelvin(option_id) {
                Some(kelvin) => self.apply_primary(setting_id, option_id, |backend| {
                    backend.set_white_balance(kelvin)
                }),
                None => self.reject_option(setting_id, option_id),
            },
            settings::CAM_EXPMODE | settings::CAM_VIDFMT => {
                // No pipeline control behind these; acknowledge and cache.
                self.registry.upsert(setting_id, option_id);
                Outcome::Success
            }
            settings::CAM_EV => match settings::parse_exposure_option(option_id) {
                Some(ev) => self.apply_primary(setting_id, option_id, |backend| {
                    backend.set_exposure_value(ev)
                }),
                None => self.reject_option(setting_id, option_id),
            },
            settings::CAM_ISO => match option_id.parse::<u32>() {
                Ok(iso) => {
                    self.apply_primary(setting_id, option_id, |backend| backend.set_iso(iso))
                }
                Err(_) => self.reject_option(setting_id, option_id),
            },
            settings::CAM_SHUTTERSPD => match settings::parse_shutter_option(option_id) {
                Some(seconds) => self.apply_primary(setting_id, option_id, |backend| {
                    backend.set_shutter_speed(seconds)
                }),
                None => self.reject_option(setting_id, option_id),
            },
            settings::CAM_VIDRES => match settings::video_matrix_entry(option_id) {
                Some((width, height, fps)) => {
                    let outcome = self.apply_primary(setting_id, option_id, |backend| {
                        backend.set_video_resolution(width, height)?;
                        backend.set_framerate(fps)
                    });
                    if outcome == Outcome::Success {
                        self.framerate = fps;
                    }
                    outcome
                }
                None => self.reject_option(setting_id, option_id),
            },
            settings::IRCAM_PALETTE => match option_id.parse::<i32>() {
                Ok(palette) => {
                    let Some(thermal) = self.loader.thermal_mut() else {
                        warn!(setting_id, "thermal module not loaded");
                        return Outcome::Error;
                    };
                    let outcome = Outcome::from_thermal(thermal.set_color_mode(palette));
                    if outcome == Outcome::Success {
                        self.registry.upsert(setting_id, option_id);
                    }
                    outcome
                }
                Err(_) => self.reject_option(setting_id, option_id),
            },
            settings::IRCAM_FFC => {
                let Some(thermal) = self.loader.thermal_mut() else {
                    warn!(setting_id, "thermal module not loaded");
                    return Outcome::Error;
                };
                // Momentary trigger; the cached idle value stays put.
                Outcome::from_thermal(thermal.run_shutter_calibration())
            }
            _ => {
                warn!(setting_id, "unknown setting id");
                Outcome::WrongArgument
            }
        }
    }

    /// Shared backend-then-cache step for primary-owned settings.
    fn apply_primary<F>(&mut self, setting_id: &str, option_id: &str, call: F) -> Outcome
    where
        F: FnOnce(&mut dyn CameraBackend) -> BackendResult<()>,
    {
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(call(backend));
        if outcome == Outcome::Success {
            self.registry.upsert(setting_id, option_id);
        } else {
            warn!(setting_id, option_id, %outcome, "setting rejected by backend");
        }
        outcome
    }

    fn reject_option(&self, setting_id: &str, option_id: &str) -> Outcome {
        warn!(setting_id, option_id, "option outside the accepted set");
        Outcome::WrongArgument
    }

    /// Best-effort reset: every resettable setting is attempted even when an
    /// earlier one fails, and any failure turns the aggregate into `Error`.
    pub fn reset_settings(&mut self) -> Outcome {
        if !self.loader.has_primary() {
            return Outcome::NoSystem;
        }
        let mut failed = 0usize;
        for (setting_id, option_id) in settings::RESET_DEFAULTS {
            let outcome = self.set_setting(setting_id, option_id);
            if !outcome.is_success() {
                warn!(setting_id, %outcome, "reset step failed");
                failed += 1;
            }
        }
        if failed == 0 {
            info!("settings reset to defaults");
            Outcome::Success
        } else {
            warn!(failed, "settings reset incomplete");
            Outcome::Error
        }
    }

    // === Storage and clock ===

    pub fn format_storage(&mut self, storage_id: i32) -> Outcome {
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(backend.format_storage(storage_id));
        info!(storage_id, %outcome, "storage format");
        outcome
    }

    pub fn set_timestamp(&mut self, epoch_ms: i64) -> Outcome {
        let Some(backend) = self.loader.primary_mut() else {
            return Outcome::NoSystem;
        };
        let outcome = Outcome::from_backend(backend.set_timestamp(epoch_ms));
        debug!(epoch_ms, %outcome, "clock sync");
        outcome
    }

    /// The controller pushes the definition file contents after fetching
    /// it; nothing here consumes them yet.
    pub fn set_definition_data(&mut self, data: &str) -> Outcome {
        debug!(bytes = data.len(), "definition data accepted");
        Outcome::Success
    }

    // === Descriptors ===

    pub fn information(&mut self) -> Information {
        let queried = self.loader.primary_mut().map(CameraBackend::information);
        match queried {
            Some(Ok(info)) => Information::from_backend(info),
            Some(Err(err)) => {
                warn!(%err, "device information query failed");
                Information::unknown()
            }
            None => Information::unknown(),
        }
    }

    /// Describe the preview stream, or `None` when the device is not
    /// prepared. The preview always streams, so the status is a constant
    /// `InProgress`.
    pub fn video_stream_info(&mut self) -> Option<VideoStreamInfo> {
        let backend = self.loader.primary_mut()?;
        let (width, height) = backend.preview_resolution().unwrap_or((0, 0));
        Some(VideoStreamInfo {
            stream_id: 1,
            frame_rate_hz: self.framerate as f32,
            horizontal_resolution_px: width,
            vertical_resolution_px: height,
            bit_rate_bps: 0,
            rotation_deg: 0,
            horizontal_fov_deg: 0,
            uri: STREAM_URI.to_string(),
            status: StreamStatus::InProgress,
            spectrum: StreamSpectrum::VisibleLight,
        })
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status::compose(
            &self.storage.snapshot(),
            &self.recording,
            self.config.media_folder(),
        )
    }

    // === Operations with no backend equivalent ===

    pub fn start_photo_interval(&mut self, interval_s: f32) -> Outcome {
        debug!(interval_s, "photo interval not supported by this payload");
        Outcome::ProtocolUnsupported
    }

    pub fn stop_photo_interval(&mut self) -> Outcome {
        debug!("photo interval not supported by this payload");
        Outcome::ProtocolUnsupported
    }

    /// The preview stream runs unconditionally; there is nothing to start.
    pub fn start_video_streaming(&mut self, stream_id: u8) -> Outcome {
        debug!(stream_id, "video streaming runs unconditionally");
        Outcome::ProtocolUnsupported
    }

    pub fn stop_video_streaming(&mut self, stream_id: u8) -> Outcome {
        debug!(stream_id, "video streaming runs unconditionally");
        Outcome::ProtocolUnsupported
    }

    pub fn select_camera(&mut self, camera_id: u8) -> Outcome {
        debug!(camera_id, "camera selection not supported by this payload");
        Outcome::ProtocolUnsupported
    }

    pub fn list_photos(&mut self, range: PhotosRange) -> (Outcome, Vec<CaptureInfo>) {
        debug!(?range, "photo listing not supported by this payload");
        (Outcome::ProtocolUnsupported, Vec::new())
    }
}
