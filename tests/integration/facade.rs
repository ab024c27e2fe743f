//! Facade behavior tests over scripted mock backends.
//!
//! Exercises the paths where several components interact: bring-up seeding
//! against staged hardware, cache/backend agreement under rejection, the
//! optional thermal extension, and the storage push pipeline.

use aircam::backend::mock::{MockBackend, MockThermal, Operation, ThermalOperation};
use aircam::backend::{BackendError, CaptureMode, MediaKind, StorageInformation, StorageState, ThermalError};
use aircam::mode::Mode;
use aircam::outcome::Outcome;
use aircam::settings;
use aircam::status::{StorageStatus, StorageType};

use crate::common::init_test_logging;
use crate::common::rig::{prepared_camera, prepared_camera_from, prepared_camera_with_thermal};

fn cached_option(camera: &aircam::device::Camera, setting_id: &str) -> String {
    let (outcome, setting) = camera.get_setting(setting_id);
    assert_eq!(outcome, Outcome::Success, "{setting_id} not cached");
    setting.option.option_id
}

/// A full mission pass drives the backend in the exact order the facade
/// promises: mode switch, recording bracket, shutdown.
#[test]
fn mission_flow_drives_backend_in_order() {
    init_test_logging();
    let (mut camera, handle) = prepared_camera();
    handle.clear_operations();

    assert_eq!(camera.set_mode(Mode::Video), Outcome::Success);
    assert_eq!(camera.start_video(), Outcome::Success);
    assert!(camera.status().video_on);
    assert_eq!(camera.take_photo(), Outcome::Success);
    assert_eq!(camera.stop_video(), Outcome::Success);
    assert!(!camera.status().video_on);
    camera.close();

    handle.assert_operations(&[
        Operation::SetCaptureMode {
            mode: CaptureMode::Movie,
        },
        Operation::StartVideo,
        Operation::TakePhoto,
        Operation::StopVideo,
        Operation::Close,
    ]);
}

/// Hardware that answers bring-up queries with non-default state ends up
/// faithfully mirrored in the settings cache.
#[test]
fn bring_up_reflects_divergent_hardware_state() {
    init_test_logging();
    let mock = MockBackend::builder()
        .with_preview_target(2)
        .with_white_balance(6500)
        .with_exposure_value(-1.5)
        .with_iso(800)
        .with_shutter_speed(0.005)
        .with_video_resolution(1920, 1080)
        .build();
    let (camera, _handle) = prepared_camera_from(mock);

    assert_eq!(cached_option(&camera, settings::CAM_DISPLAY_MODE), "2");
    assert_eq!(cached_option(&camera, settings::CAM_WBMODE), "2");
    assert_eq!(cached_option(&camera, settings::CAM_EV), "-1.5");
    assert_eq!(cached_option(&camera, settings::CAM_ISO), "800");
    assert_eq!(cached_option(&camera, settings::CAM_SHUTTERSPD), "1/200");
    // 1920x1080 at the default 30 fps sits at matrix entry 3.
    assert_eq!(cached_option(&camera, settings::CAM_VIDRES), "3");
}

/// A failing bring-up query only affects its own setting; the rest still
/// seed from hardware.
#[test]
fn seed_queries_fall_back_per_setting() {
    init_test_logging();
    let mock = MockBackend::builder()
        .with_exposure_value(1.5)
        .reject("white_balance", BackendError::Fault)
        .reject("iso", BackendError::Timeout)
        .build();
    let (camera, _handle) = prepared_camera_from(mock);

    assert_eq!(cached_option(&camera, settings::CAM_WBMODE), "0");
    assert_eq!(cached_option(&camera, settings::CAM_ISO), "125");
    assert_eq!(cached_option(&camera, settings::CAM_EV), "1.5");
    assert_eq!(camera.current_settings().len(), 10);
}

/// A one-shot backend failure surfaces once and leaves no residue.
#[test]
fn transient_backend_error_is_isolated() {
    init_test_logging();
    let (mut camera, handle) = prepared_camera();
    handle.clear_operations();

    handle.inject_error(BackendError::Busy);
    assert_eq!(camera.take_photo(), Outcome::Busy);
    assert_eq!(camera.take_photo(), Outcome::Success);

    // The rejected call never reached the hardware.
    handle.assert_operations(&[Operation::TakePhoto]);
}

/// Preparing again rebuilds the registry and drops session state.
#[test]
fn reprepare_reseeds_registry_and_mode() {
    init_test_logging();
    let (mut camera, _handle) = prepared_camera();

    assert_eq!(camera.set_mode(Mode::Video), Outcome::Success);
    assert_eq!(
        camera.set_setting(settings::CAM_EXPMODE, "1"),
        Outcome::Success
    );
    assert_eq!(cached_option(&camera, settings::CAM_EXPMODE), "1");
    assert_eq!(camera.start_video(), Outcome::Success);

    assert_eq!(camera.prepare(), Outcome::Success);

    assert_eq!(camera.mode(), Mode::Photo);
    assert_eq!(cached_option(&camera, settings::CAM_EXPMODE), "0");
    assert_eq!(camera.current_settings().len(), 10);
    assert!(!camera.status().video_on);
}

/// Closing releases an injected backend for good; it cannot be revived.
#[test]
fn close_is_terminal_for_injected_backends() {
    init_test_logging();
    let (mut camera, handle) = prepared_camera();
    camera.close();

    assert!(!camera.is_prepared());
    assert_eq!(camera.take_photo(), Outcome::NoSystem);
    assert_eq!(camera.prepare(), Outcome::Error);
    handle.assert_contains(&Operation::Close);
}

/// A thermal sensor that fails its serial bring-up degrades the device
/// instead of failing preparation.
#[test]
fn thermal_init_failure_degrades_not_fails() {
    init_test_logging();
    let (mut camera, _handle, thermal_handle) =
        prepared_camera_with_thermal(MockThermal::failing_init());

    assert!(!camera.thermal_available());
    assert_eq!(thermal_handle.operation_count(), 0);
    assert_eq!(camera.current_settings().len(), 10);

    // Thermal settings answer with an error, primary ones keep working.
    assert_eq!(camera.set_setting(settings::IRCAM_PALETTE, "3"), Outcome::Error);
    assert_eq!(camera.set_setting(settings::CAM_ISO, "800"), Outcome::Success);
}

/// Palette changes flow through to the thermal hardware and into the cache;
/// the calibration trigger fires without disturbing its cached idle value.
#[test]
fn thermal_palette_and_calibration_flow() {
    init_test_logging();
    let (mut camera, _handle, thermal_handle) = prepared_camera_with_thermal(MockThermal::new());
    assert!(camera.thermal_available());

    assert_eq!(camera.set_setting(settings::IRCAM_PALETTE, "3"), Outcome::Success);
    assert_eq!(thermal_handle.color_mode(), 3);
    assert_eq!(cached_option(&camera, settings::IRCAM_PALETTE), "3");

    assert_eq!(camera.set_setting(settings::IRCAM_FFC, "1"), Outcome::Success);
    assert_eq!(cached_option(&camera, settings::IRCAM_FFC), "0");
    assert!(thermal_handle
        .operations()
        .contains(&ThermalOperation::RunShutterCalibration));
}

/// A rejected palette write leaves the cache at its last accepted value.
#[test]
fn thermal_rejection_keeps_cached_palette() {
    init_test_logging();
    let (mut camera, _handle, thermal_handle) = prepared_camera_with_thermal(MockThermal::new());

    thermal_handle.reject("set_color_mode", ThermalError(-5));
    assert_eq!(camera.set_setting(settings::IRCAM_PALETTE, "4"), Outcome::Error);
    assert_eq!(cached_option(&camera, settings::IRCAM_PALETTE), "0");
}

/// Storage pushes travel backend -> subscription -> status, each push
/// replacing the previous snapshot wholesale.
#[test]
fn storage_pushes_reach_status_through_subscription() {
    init_test_logging();
    let (camera, handle) = prepared_camera();

    assert!(handle.push_storage(StorageInformation {
        storage_id: 1,
        available_capacity_mib: 1000.0,
        total_capacity_mib: 4000.0,
        state: StorageState::Ready,
        media: MediaKind::MicroSd,
    }));
    let status = camera.status();
    assert_eq!(status.storage_id, 1);
    assert_eq!(status.total_storage_mib, 4000.0);
    assert_eq!(status.used_storage_mib, 3000.0);
    assert_eq!(status.storage_status, StorageStatus::Formatted);
    assert_eq!(status.storage_type, StorageType::Microsd);

    assert!(handle.push_storage(StorageInformation {
        storage_id: 2,
        available_capacity_mib: 0.0,
        total_capacity_mib: 0.0,
        state: StorageState::Missing,
        media: MediaKind::Unknown,
    }));
    let status = camera.status();
    assert_eq!(status.storage_id, 2);
    assert_eq!(status.storage_status, StorageStatus::NotAvailable);
    assert_eq!(status.total_storage_mib, 0.0);
}

/// Reset restores what it can, reports the failure, and leaves the cache
/// honest about what the hardware actually accepted.
#[test]
fn reset_reports_error_when_one_restore_fails() {
    init_test_logging();
    let (mut camera, handle) = prepared_camera();

    assert_eq!(camera.set_setting(settings::CAM_ISO, "800"), Outcome::Success);
    assert_eq!(camera.set_setting(settings::CAM_WBMODE, "2"), Outcome::Success);

    handle.reject("set_white_balance", BackendError::Fault);
    assert_eq!(camera.reset_settings(), Outcome::Error);

    assert_eq!(cached_option(&camera, settings::CAM_ISO), "125");
    assert_eq!(cached_option(&camera, settings::CAM_WBMODE), "2");
}

/// Stream info stays available when the preview resolution query fails;
/// only the geometry is zeroed.
#[test]
fn stream_info_survives_preview_query_failure() {
    init_test_logging();
    let (mut camera, handle) = prepared_camera();
    handle.reject("preview_resolution", BackendError::Fault);

    let info = camera.video_stream_info().expect("prepared camera has a stream");
    assert_eq!(info.horizontal_resolution_px, 0);
    assert_eq!(info.vertical_resolution_px, 0);
    assert_eq!(info.uri, "rtsp://192.168.251.1/live");
    assert_eq!(info.stream_id, 1);
}
