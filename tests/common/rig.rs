//! Mock-backed camera assemblies.
//!
//! Builds a [`Camera`] over the in-memory mock backends and hands back the
//! assertion handles, so tests can script hardware behavior and inspect the
//! calls the facade made.

use aircam::backend::mock::{MockBackend, MockHandle, MockThermal, ThermalHandle};
use aircam::config::Config;
use aircam::device::Camera;
use aircam::outcome::Outcome;

/// A prepared camera over a nominal primary mock.
///
/// # Panics
///
/// Panics if bring-up does not succeed.
#[must_use]
pub fn prepared_camera() -> (Camera, MockHandle) {
    let mock = MockBackend::new();
    let handle = mock.handle();
    let mut camera = Camera::with_backends(Box::new(mock), None, Config::default());
    assert_eq!(camera.prepare(), Outcome::Success);
    (camera, handle)
}

/// A prepared camera over a staged primary mock.
///
/// # Panics
///
/// Panics if bring-up does not succeed.
#[must_use]
pub fn prepared_camera_from(mock: MockBackend) -> (Camera, MockHandle) {
    let handle = mock.handle();
    let mut camera = Camera::with_backends(Box::new(mock), None, Config::default());
    assert_eq!(camera.prepare(), Outcome::Success);
    (camera, handle)
}

/// A prepared camera with both the primary mock and a thermal mock fitted.
///
/// # Panics
///
/// Panics if bring-up does not succeed.
#[must_use]
pub fn prepared_camera_with_thermal(thermal: MockThermal) -> (Camera, MockHandle, ThermalHandle) {
    let mock = MockBackend::new();
    let handle = mock.handle();
    let thermal_handle = thermal.handle();
    let mut camera =
        Camera::with_backends(Box::new(mock), Some(Box::new(thermal)), Config::default());
    assert_eq!(camera.prepare(), Outcome::Success);
    (camera, handle, thermal_handle)
}
