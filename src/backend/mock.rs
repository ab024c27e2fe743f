//! Mock backends for unit testing.
//!
//! This module provides scriptable stand-ins for the two vendor modules.
//! Every call is recorded for later assertion, query answers can be staged,
//! and individual operations can be made to fail.
//!
//! Because the facade takes ownership of the boxed backend, assertions go
//! through a [`MockHandle`] cloned out before the move:
//!
//! ```rust,ignore
//! use aircam::backend::mock::{MockBackend, Operation};
//!
//! let mock = MockBackend::new();
//! let handle = mock.handle();
//! let mut camera = Camera::with_backends(Box::new(mock), None, Config::default());
//!
//! camera.prepare();
//! handle.assert_contains(&Operation::Open);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use super::{
    BackendError, BackendInformation, BackendResult, CameraBackend, CaptureMode, OpenOptions,
    StorageCallback, StorageInformation, ThermalBackend, ThermalError, ThermalResult,
};

/// Recorded primary-backend operation for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Open,
    Close,
    GetCaptureMode,
    SetCaptureMode { mode: CaptureMode },
    TakePhoto,
    StartVideo,
    StopVideo,
    GetPreviewTarget,
    SetPreviewTarget { target: i32 },
    GetSnapshotResolution,
    SetSnapshotResolution { width: u32, height: u32 },
    GetWhiteBalance,
    SetWhiteBalance { kelvin: u32 },
    GetExposureValue,
    SetExposureValue { ev: f32 },
    GetIso,
    SetIso { iso: u32 },
    GetShutterSpeed,
    SetShutterSpeed { seconds: f32 },
    GetVideoResolution,
    SetVideoResolution { width: u32, height: u32 },
    GetFramerate,
    SetFramerate { fps: u32 },
    FormatStorage { storage_id: i32 },
    SetTimestamp { epoch_ms: i64 },
    SubscribeStorage,
    GetInformation,
    GetPreviewResolution,
}

/// Staged query answers; setters overwrite them like real hardware would.
#[derive(Debug, Clone)]
struct MockValues {
    mode: CaptureMode,
    preview_target: i32,
    snapshot: (u32, u32),
    white_balance: u32,
    exposure_value: f32,
    iso: u32,
    shutter_speed: f32,
    video: (u32, u32),
    framerate: u32,
    preview: (u32, u32),
}

impl Default for MockValues {
    fn default() -> Self {
        Self {
            mode: CaptureMode::Still,
            preview_target: 0,
            snapshot: (4624, 3472),
            white_balance: 0,
            exposure_value: 0.0,
            iso: 125,
            shutter_speed: 0.01,
            video: (3840, 2160),
            framerate: 30,
            preview: (1920, 1440),
        }
    }
}

struct MockState {
    operation_log: Mutex<Vec<Operation>>,
    one_shot_error: Mutex<Option<BackendError>>,
    rejections: Mutex<HashMap<&'static str, BackendError>>,
    values: Mutex<MockValues>,
    storage_callback: Mutex<Option<StorageCallback>>,
    information: BackendInformation,
}

/// Mock primary backend for testing without vendor hardware.
pub struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    /// Create a mock with nominal hardware answers.
    #[must_use]
    pub fn new() -> Self {
        MockBackendBuilder::new().build()
    }

    /// Start building a mock with staged answers or scripted failures.
    #[must_use]
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::new()
    }

    /// Clone out an assertion handle; stays valid after the mock moves into
    /// the facade.
    #[must_use]
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }

    // === Internal Helpers ===

    fn record(&self, op: Operation) {
        trace!(?op, "recording mock operation");
        self.state.operation_log.lock().unwrap().push(op);
    }

    fn guard(&self, op: &'static str) -> BackendResult<()> {
        if let Some(error) = self.state.one_shot_error.lock().unwrap().take() {
            return Err(error);
        }
        if let Some(error) = self.state.rejections.lock().unwrap().get(op) {
            return Err(*error);
        }
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for MockBackend {
    /// Adopts the initial capture mode from the options. Other staged query
    /// answers are left as built so tests can stage hardware state that
    /// diverges from the open defaults.
    fn open(&mut self, options: &OpenOptions) -> BackendResult<()> {
        self.guard("open")?;
        self.record(Operation::Open);
        self.state.values.lock().unwrap().mode = options.mode;
        Ok(())
    }

    fn close(&mut self) {
        self.record(Operation::Close);
    }

    fn capture_mode(&mut self) -> BackendResult<CaptureMode> {
        self.guard("capture_mode")?;
        self.record(Operation::GetCaptureMode);
        Ok(self.state.values.lock().unwrap().mode)
    }

    fn set_capture_mode(&mut self, mode: CaptureMode) -> BackendResult<()> {
        self.guard("set_capture_mode")?;
        self.record(Operation::SetCaptureMode { mode });
        self.state.values.lock().unwrap().mode = mode;
        Ok(())
    }

    fn take_photo(&mut self) -> BackendResult<()> {
        self.guard("take_photo")?;
        self.record(Operation::TakePhoto);
        Ok(())
    }

    fn start_video(&mut self) -> BackendResult<()> {
        self.guard("start_video")?;
        self.record(Operation::StartVideo);
        Ok(())
    }

    fn stop_video(&mut self) -> BackendResult<()> {
        self.guard("stop_video")?;
        self.record(Operation::StopVideo);
        Ok(())
    }

    fn preview_target(&mut self) -> BackendResult<i32> {
        self.guard("preview_target")?;
        self.record(Operation::GetPreviewTarget);
        Ok(self.state.values.lock().unwrap().preview_target)
    }

    fn set_preview_target(&mut self, target: i32) -> BackendResult<()> {
        self.guard("set_preview_target")?;
        self.record(Operation::SetPreviewTarget { target });
        self.state.values.lock().unwrap().preview_target = target;
        Ok(())
    }

    fn snapshot_resolution(&mut self) -> BackendResult<(u32, u32)> {
        self.guard("snapshot_resolution")?;
        self.record(Operation::GetSnapshotResolution);
        Ok(self.state.values.lock().unwrap().snapshot)
    }

    fn set_snapshot_resolution(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.guard("set_snapshot_resolution")?;
        self.record(Operation::SetSnapshotResolution { width, height });
        self.state.values.lock().unwrap().snapshot = (width, height);
        Ok(())
    }

    fn white_balance(&mut self) -> BackendResult<u32> {
        self.guard("white_balance")?;
        self.record(Operation::GetWhiteBalance);
        Ok(self.state.values.lock().unwrap().white_balance)
    }

    fn set_white_balance(&mut self, kelvin: u32) -> BackendResult<()> {
        self.guard("set_white_balance")?;
        self.record(Operation::SetWhiteBalance { kelvin });
        self.state.values.lock().unwrap().white_balance = kelvin;
        Ok(())
    }

    fn exposure_value(&mut self) -> BackendResult<f32> {
        self.guard("exposure_value")?;
        self.record(Operation::GetExposureValue);
        Ok(self.state.values.lock().unwrap().exposure_value)
    }

    fn set_exposure_value(&mut self, ev: f32) -> BackendResult<()> {
        self.guard("set_exposure_value")?;
        self.record(Operation::SetExposureValue { ev });
        self.state.values.lock().unwrap().exposure_value = ev;
        Ok(())
    }

    fn iso(&mut self) -> BackendResult<u32> {
        self.guard("iso")?;
        self.record(Operation::GetIso);
        Ok(self.state.values.lock().unwrap().iso)
    }

    fn set_iso(&mut self, iso: u32) -> BackendResult<()> {
        self.guard("set_iso")?;
        self.record(Operation::SetIso { iso });
        self.state.values.lock().unwrap().iso = iso;
        Ok(())
    }

    fn shutter_speed(&mut self) -> BackendResult<f32> {
        self.guard("shutter_speed")?;
        self.record(Operation::GetShutterSpeed);
        Ok(self.state.values.lock().unwrap().shutter_speed)
    }

    fn set_shutter_speed(&mut self, seconds: f32) -> BackendResult<()> {
        self.guard("set_shutter_speed")?;
        self.record(Operation::SetShutterSpeed { seconds });
        self.state.values.lock().unwrap().shutter_speed = seconds;
        Ok(())
    }

    fn video_resolution(&mut self) -> BackendResult<(u32, u32)> {
        self.guard("video_resolution")?;
        self.record(Operation::GetVideoResolution);
        Ok(self.state.values.lock().unwrap().video)
    }

    fn set_video_resolution(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.guard("set_video_resolution")?;
        self.record(Operation::SetVideoResolution { width, height });
        self.state.values.lock().unwrap().video = (width, height);
        Ok(())
    }

    fn framerate(&mut self) -> BackendResult<u32> {
        self.guard("framerate")?;
        self.record(Operation::GetFramerate);
        Ok(self.state.values.lock().unwrap().framerate)
    }

    fn set_framerate(&mut self, fps: u32) -> BackendResult<()> {
        self.guard("set_framerate")?;
        self.record(Operation::SetFramerate { fps });
        self.state.values.lock().unwrap().framerate = fps;
        Ok(())
    }

    fn format_storage(&mut self, storage_id: i32) -> BackendResult<()> {
        self.guard("format_storage")?;
        self.record(Operation::FormatStorage { storage_id });
        Ok(())
    }

    fn set_timestamp(&mut self, epoch_ms: i64) -> BackendResult<()> {
        self.guard("set_timestamp")?;
        self.record(Operation::SetTimestamp { epoch_ms });
        Ok(())
    }

    fn subscribe_storage_information(&mut self, callback: StorageCallback) {
        self.record(Operation::SubscribeStorage);
        *self.state.storage_callback.lock().unwrap() = Some(callback);
    }

    fn information(&mut self) -> BackendResult<BackendInformation> {
        self.guard("information")?;
        self.record(Operation::GetInformation);
        Ok(self.state.information.clone())
    }

    fn preview_resolution(&mut self) -> BackendResult<(u32, u32)> {
        self.guard("preview_resolution")?;
        self.record(Operation::GetPreviewResolution);
        Ok(self.state.values.lock().unwrap().preview)
    }
}

/// Assertion and scripting handle for a [`MockBackend`].
///
/// Clones share the same underlying state and may cross threads.
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<MockState>,
}

impl MockHandle {
    /// All recorded operations, in call order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.state.operation_log.lock().unwrap().clone()
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.state.operation_log.lock().unwrap().len()
    }

    /// Number of recorded mode-switch invocations.
    #[must_use]
    pub fn mode_switch_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, Operation::SetCaptureMode { .. }))
            .count()
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.state.operation_log.lock().unwrap().clear();
    }

    /// Assert the exact operation sequence.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, but found: {ops:#?}");
    }

    /// Assert a specific operation was performed at least once.
    ///
    /// # Panics
    ///
    /// Panics if the operation was not found.
    pub fn assert_contains(&self, expected: &Operation) {
        let ops = self.operations();
        assert!(
            ops.contains(expected),
            "Expected operation {expected:?} not found in: {ops:#?}",
        );
    }

    /// Fail the next operation, whatever it is, with `error`.
    pub fn inject_error(&self, error: BackendError) {
        *self.state.one_shot_error.lock().unwrap() = Some(error);
    }

    /// Fail every future call of the named operation with `error`.
    pub fn reject(&self, op: &'static str, error: BackendError) {
        self.state.rejections.lock().unwrap().insert(op, error);
    }

    /// Remove a standing rejection.
    pub fn allow(&self, op: &'static str) {
        self.state.rejections.lock().unwrap().remove(op);
    }

    /// True once the facade has registered its storage callback.
    #[must_use]
    pub fn has_storage_subscription(&self) -> bool {
        self.state.storage_callback.lock().unwrap().is_some()
    }

    /// Drive the registered storage callback as the backend would from its
    /// own context. Returns false when nothing is subscribed.
    pub fn push_storage(&self, info: StorageInformation) -> bool {
        let callback = self.state.storage_callback.lock().unwrap();
        match callback.as_ref() {
            Some(cb) => {
                cb(info);
                true
            }
            None => false,
        }
    }
}

/// Builder for a [`MockBackend`] with staged answers and scripted failures.
pub struct MockBackendBuilder {
    values: MockValues,
    rejections: HashMap<&'static str, BackendError>,
    information: BackendInformation,
}

impl MockBackendBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: MockValues::default(),
            rejections: HashMap::new(),
            information: nominal_information(),
        }
    }

    /// Stage the capture mode reported before `open` adopts one.
    #[must_use]
    pub fn with_mode(mut self, mode: CaptureMode) -> Self {
        self.values.mode = mode;
        self
    }

    /// Stage the reported preview/display routing target.
    #[must_use]
    pub fn with_preview_target(mut self, target: i32) -> Self {
        self.values.preview_target = target;
        self
    }

    /// Stage the reported white balance in kelvin.
    #[must_use]
    pub fn with_white_balance(mut self, kelvin: u32) -> Self {
        self.values.white_balance = kelvin;
        self
    }

    /// Stage the reported exposure compensation.
    #[must_use]
    pub fn with_exposure_value(mut self, ev: f32) -> Self {
        self.values.exposure_value = ev;
        self
    }

    /// Stage the reported ISO.
    #[must_use]
    pub fn with_iso(mut self, iso: u32) -> Self {
        self.values.iso = iso;
        self
    }

    /// Stage the reported shutter speed in seconds.
    #[must_use]
    pub fn with_shutter_speed(mut self, seconds: f32) -> Self {
        self.values.shutter_speed = seconds;
        self
    }

    /// Stage the reported movie resolution.
    #[must_use]
    pub fn with_video_resolution(mut self, width: u32, height: u32) -> Self {
        self.values.video = (width, height);
        self
    }

    /// Stage the reported framerate.
    #[must_use]
    pub fn with_framerate(mut self, fps: u32) -> Self {
        self.values.framerate = fps;
        self
    }

    /// Replace the reported device description.
    #[must_use]
    pub fn with_information(mut self, information: BackendInformation) -> Self {
        self.information = information;
        self
    }

    /// Fail every call of the named operation with `error`.
    #[must_use]
    pub fn reject(mut self, op: &'static str, error: BackendError) -> Self {
        self.rejections.insert(op, error);
        self
    }

    #[must_use]
    pub fn build(self) -> MockBackend {
        MockBackend {
            state: Arc::new(MockState {
                operation_log: Mutex::new(Vec::new()),
                one_shot_error: Mutex::new(None),
                rejections: Mutex::new(self.rejections),
                values: Mutex::new(self.values),
                storage_callback: Mutex::new(None),
                information: self.information,
            }),
        }
    }
}

impl Default for MockBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Device description reported by the nominal mock, mirroring the shipping
/// AC220T payload.
#[must_use]
pub fn nominal_information() -> BackendInformation {
    BackendInformation {
        vendor_name: "AirCam Systems".to_string(),
        model_name: "AC220T".to_string(),
        firmware_version: "0.9.1".to_string(),
        focal_length_mm: 4.74,
        horizontal_sensor_size_mm: 6.287,
        vertical_sensor_size_mm: 4.712,
        horizontal_resolution_px: 9248,
        vertical_resolution_px: 6944,
        lens_id: 0,
        definition_file_version: 3,
        definition_file_uri: "mftp://definition/AC220T.xml".to_string(),
    }
}

// === Thermal mock ===

/// Recorded thermal-backend operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThermalOperation {
    Initialize { baud: u32, lines: u32 },
    GetSerialNumber,
    GetPartNumber,
    GetColorMode,
    SetColorMode { mode: i32 },
    RunShutterCalibration,
}

struct ThermalState {
    operation_log: Mutex<Vec<ThermalOperation>>,
    rejections: Mutex<HashMap<&'static str, ThermalError>>,
    color_mode: Mutex<i32>,
    serial_number: u32,
    part_number: String,
}

/// Mock thermal extension.
pub struct MockThermal {
    state: Arc<ThermalState>,
}

impl MockThermal {
    /// Create a mock that probes successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rejections(HashMap::new())
    }

    /// Create a mock whose serial-link bring-up fails, as a never-fitted or
    /// faulty sensor would.
    #[must_use]
    pub fn failing_init() -> Self {
        let mut rejections = HashMap::new();
        rejections.insert("initialize", ThermalError(-2));
        Self::with_rejections(rejections)
    }

    fn with_rejections(rejections: HashMap<&'static str, ThermalError>) -> Self {
        Self {
            state: Arc::new(ThermalState {
                operation_log: Mutex::new(Vec::new()),
                rejections: Mutex::new(rejections),
                color_mode: Mutex::new(0),
                serial_number: 73321,
                part_number: "21043-200".to_string(),
            }),
        }
    }

    /// Clone out an assertion handle.
    #[must_use]
    pub fn handle(&self) -> ThermalHandle {
        ThermalHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn record(&self, op: ThermalOperation) {
        trace!(?op, "recording mock thermal operation");
        self.state.operation_log.lock().unwrap().push(op);
    }

    fn guard(&self, op: &'static str) -> ThermalResult<()> {
        if let Some(error) = self.state.rejections.lock().unwrap().get(op) {
            return Err(*error);
        }
        Ok(())
    }
}

impl Default for MockThermal {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalBackend for MockThermal {
    fn initialize(&mut self, baud_rate: u32, data_lines: u32) -> ThermalResult<()> {
        self.guard("initialize")?;
        self.record(ThermalOperation::Initialize {
            baud: baud_rate,
            lines: data_lines,
        });
        Ok(())
    }

    fn serial_number(&mut self) -> ThermalResult<u32> {
        self.guard("serial_number")?;
        self.record(ThermalOperation::GetSerialNumber);
        Ok(self.state.serial_number)
    }

    fn part_number(&mut self) -> ThermalResult<String> {
        self.guard("part_number")?;
        self.record(ThermalOperation::GetPartNumber);
        Ok(self.state.part_number.clone())
    }

    fn color_mode(&mut self) -> ThermalResult<i32> {
        self.guard("color_mode")?;
        self.record(ThermalOperation::GetColorMode);
        Ok(*self.state.color_mode.lock().unwrap())
    }

    fn set_color_mode(&mut self, mode: i32) -> ThermalResult<()> {
        self.guard("set_color_mode")?;
        self.record(ThermalOperation::SetColorMode { mode });
        *self.state.color_mode.lock().unwrap() = mode;
        Ok(())
    }

    fn run_shutter_calibration(&mut self) -> ThermalResult<()> {
        self.guard("run_shutter_calibration")?;
        self.record(ThermalOperation::RunShutterCalibration);
        Ok(())
    }
}

/// Assertion and scripting handle for a [`MockThermal`].
#[derive(Clone)]
pub struct ThermalHandle {
    state: Arc<ThermalState>,
}

impl ThermalHandle {
    /// All recorded operations, in call order.
    #[must_use]
    pub fn operations(&self) -> Vec<ThermalOperation> {
        self.state.operation_log.lock().unwrap().clone()
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.state.operation_log.lock().unwrap().len()
    }

    /// Fail every future call of the named operation with `error`.
    pub fn reject(&self, op: &'static str, error: ThermalError) {
        self.state.rejections.lock().unwrap().insert(op, error);
    }

    /// Currently selected palette id.
    #[must_use]
    pub fn color_mode(&self) -> i32 {
        *self.state.color_mode.lock().unwrap()
    }
}
