//! Hardware backend capability surfaces.
//!
//! The payload carries two vendor modules loaded at runtime: the primary
//! visible/multispectral camera and an optional thermal extension. Both are
//! reached through capability traits so the rest of the crate never depends
//! on a concrete vendor SDK. The [`mock`] module scripts the same surfaces
//! for tests.

pub mod mock;

use thiserror::Error;

/// Capture mode in the primary backend's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Still imaging.
    Still,
    /// Moving imaging.
    Movie,
}

/// Result dialect of the primary backend.
///
/// This is the raw vocabulary of the vendor module; it is translated into
/// [`crate::outcome::Outcome`] at the facade and never shown to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend busy")]
    Busy,
    #[error("backend denied the request")]
    Denied,
    #[error("backend hardware fault")]
    Fault,
    #[error("backend timed out")]
    Timeout,
    #[error("backend rejected the argument")]
    InvalidArgument,
    #[error("no backend device")]
    NoDevice,
    /// Accepted and still running. Not a failure for command-style calls,
    /// but the facade does not treat it as confirmed completion either.
    #[error("backend operation in progress")]
    InProgress,
    #[error("backend status {0}")]
    Unknown(i32),
}

/// Convenience alias for primary-backend call results.
pub type BackendResult<T> = Result<T, BackendError>;

/// Raw status word from the thermal extension. The extension reports a
/// single status code with no finer classification.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("thermal extension status {0}")]
pub struct ThermalError(pub i32);

/// Convenience alias for thermal-backend call results.
pub type ThermalResult<T> = Result<T, ThermalError>;

/// Storage volume state in the backend's vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageState {
    /// No volume present.
    #[default]
    Missing,
    /// Volume present but carries no usable filesystem.
    Unformatted,
    /// Volume mounted and writable.
    Ready,
    /// Backend cannot report volume state.
    Unsupported,
}

/// Physical kind of the storage volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaKind {
    #[default]
    Unknown,
    Usb,
    SdCard,
    MicroSd,
    Disk,
    Other,
}

/// One pushed view of the active storage volume.
///
/// Pushes replace the previous snapshot wholesale; fields are never merged
/// across pushes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageInformation {
    pub storage_id: i32,
    pub available_capacity_mib: f32,
    pub total_capacity_mib: f32,
    pub state: StorageState,
    pub media: MediaKind,
}

/// Callback invoked from a backend-owned context on every storage push.
pub type StorageCallback = Box<dyn Fn(StorageInformation) + Send + 'static>;

/// Initial configuration handed to the primary backend on open.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub mode: CaptureMode,
    pub preview_width: u32,
    pub preview_height: u32,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
    pub video_width: u32,
    pub video_height: u32,
    pub framerate: u32,
    /// Filesystem prefix under which captured media lands; `None` keeps the
    /// vendor default.
    pub store_prefix: Option<String>,
}

/// Static device description reported by the primary backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendInformation {
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
}

/// Capability surface of the primary camera module.
///
/// Instances come from the module's factory symbol (see
/// [`PRIMARY_FACTORY_SYMBOL`]) or from [`mock::MockBackend`] in tests. All
/// calls are synchronous and may block for the duration of the hardware
/// operation; the only asynchronous path is the storage subscription.
pub trait CameraBackend: Send {
    /// Opens the imaging pipeline with the given initial configuration.
    fn open(&mut self, options: &OpenOptions) -> BackendResult<()>;

    /// Signals the pipeline to shut down. Called exactly once before the
    /// instance is dropped.
    fn close(&mut self);

    /// Current capture mode.
    fn capture_mode(&mut self) -> BackendResult<CaptureMode>;

    /// Switches between still and movie capture.
    fn set_capture_mode(&mut self, mode: CaptureMode) -> BackendResult<()>;

    /// Triggers one still capture.
    fn take_photo(&mut self) -> BackendResult<()>;

    /// Starts movie recording.
    fn start_video(&mut self) -> BackendResult<()>;

    /// Stops movie recording.
    fn stop_video(&mut self) -> BackendResult<()>;

    /// Current preview/display routing target.
    fn preview_target(&mut self) -> BackendResult<i32>;

    /// Routes the preview/display output.
    fn set_preview_target(&mut self, target: i32) -> BackendResult<()>;

    /// Current still-capture resolution.
    fn snapshot_resolution(&mut self) -> BackendResult<(u32, u32)>;

    /// Sets the still-capture resolution.
    fn set_snapshot_resolution(&mut self, width: u32, height: u32) -> BackendResult<()>;

    /// Current white balance in kelvin; 0 means automatic.
    fn white_balance(&mut self) -> BackendResult<u32>;

    /// Sets the white balance in kelvin; 0 selects automatic.
    fn set_white_balance(&mut self, kelvin: u32) -> BackendResult<()>;

    /// Current exposure compensation value.
    fn exposure_value(&mut self) -> BackendResult<f32>;

    /// Sets the exposure compensation value.
    fn set_exposure_value(&mut self, ev: f32) -> BackendResult<()>;

    /// Current ISO sensitivity.
    fn iso(&mut self) -> BackendResult<u32>;

    /// Sets the ISO sensitivity.
    fn set_iso(&mut self, iso: u32) -> BackendResult<()>;

    /// Current shutter speed in seconds.
    fn shutter_speed(&mut self) -> BackendResult<f32>;

    /// Sets the shutter speed in seconds.
    fn set_shutter_speed(&mut self, seconds: f32) -> BackendResult<()>;

    /// Current movie resolution.
    fn video_resolution(&mut self) -> BackendResult<(u32, u32)>;

    /// Sets the movie resolution.
    fn set_video_resolution(&mut self, width: u32, height: u32) -> BackendResult<()>;

    /// Current movie framerate in frames per second.
    fn framerate(&mut self) -> BackendResult<u32>;

    /// Sets the movie framerate.
    fn set_framerate(&mut self, fps: u32) -> BackendResult<()>;

    /// Formats the storage volume with the given id.
    fn format_storage(&mut self, storage_id: i32) -> BackendResult<()>;

    /// Sets the device wall clock, milliseconds since the Unix epoch.
    fn set_timestamp(&mut self, epoch_ms: i64) -> BackendResult<()>;

    /// Registers the storage push callback. The backend invokes it from its
    /// own execution context whenever volume state changes.
    fn subscribe_storage_information(&mut self, callback: StorageCallback);

    /// Static device description.
    fn information(&mut self) -> BackendResult<BackendInformation>;

    /// Active preview resolution.
    fn preview_resolution(&mut self) -> BackendResult<(u32, u32)>;
}

/// Capability surface of the optional thermal extension module.
pub trait ThermalBackend: Send {
    /// Brings up the serial link to the sensor core.
    fn initialize(&mut self, baud_rate: u32, data_lines: u32) -> ThermalResult<()>;

    /// Sensor serial number.
    fn serial_number(&mut self) -> ThermalResult<u32>;

    /// Sensor part number string.
    fn part_number(&mut self) -> ThermalResult<String>;

    /// Active color palette id.
    fn color_mode(&mut self) -> ThermalResult<i32>;

    /// Selects the color palette.
    fn set_color_mode(&mut self, mode: i32) -> ThermalResult<()>;

    /// Runs one flat-field correction cycle.
    fn run_shutter_calibration(&mut self) -> ThermalResult<()>;
}

/// Owned, dynamically dispatched primary backend.
pub type BoxedBackend = Box<dyn CameraBackend>;

/// Owned, dynamically dispatched thermal backend.
pub type BoxedThermal = Box<dyn ThermalBackend>;

/// Entry point exported by the primary camera module.
pub const PRIMARY_FACTORY_SYMBOL: &[u8] = b"create_payload_camera\0";

/// Entry point exported by the thermal extension module.
pub const THERMAL_FACTORY_SYMBOL: &[u8] = b"create_thermal_extension\0";

/// Signature of the primary module's factory. Yields null when the vendor
/// module cannot allocate an instance.
pub type PrimaryFactory = unsafe extern "C" fn() -> *mut dyn CameraBackend;

/// Signature of the thermal module's factory.
pub type ThermalFactory = unsafe extern "C" fn() -> *mut dyn ThermalBackend;
