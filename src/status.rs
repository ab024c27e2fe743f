//! Status aggregation: pushed storage state plus local recording state.
//!
//! The backend pushes storage snapshots from its own execution context; the
//! facade reads them synchronously. A single mutex serializes the two, with
//! replace-on-write / copy-on-read critical sections and nothing else inside
//! the lock.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;

use crate::backend::{MediaKind, StorageCallback, StorageInformation, StorageState};

/// Storage state in the controller vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStatus {
    #[default]
    NotAvailable,
    Unformatted,
    Formatted,
    NotSupported,
}

impl From<StorageState> for StorageStatus {
    fn from(state: StorageState) -> Self {
        match state {
            StorageState::Missing => Self::NotAvailable,
            StorageState::Unformatted => Self::Unformatted,
            StorageState::Ready => Self::Formatted,
            StorageState::Unsupported => Self::NotSupported,
        }
    }
}

/// Storage medium in the controller vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    #[default]
    Unknown,
    UsbStick,
    Sd,
    Microsd,
    Hd,
    Other,
}

impl From<MediaKind> for StorageType {
    fn from(media: MediaKind) -> Self {
        match media {
            MediaKind::Unknown => Self::Unknown,
            MediaKind::Usb => Self::UsbStick,
            MediaKind::SdCard => Self::Sd,
            MediaKind::MicroSd => Self::Microsd,
            MediaKind::Disk => Self::Hd,
            MediaKind::Other => Self::Other,
        }
    }
}

/// Camera status reported to the controller.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub video_on: bool,
    /// Interval capture is not supported by this payload.
    pub photo_interval_on: bool,
    pub used_storage_mib: f32,
    pub available_storage_mib: f32,
    pub total_storage_mib: f32,
    /// Seconds since the last successful video start; 0 when not recording.
    pub recording_time_s: f32,
    pub media_folder_name: String,
    pub storage_status: StorageStatus,
    pub storage_id: i32,
    pub storage_type: StorageType,
}

impl Status {
    /// Compose the controller view from the latest snapshot and the locally
    /// tracked recording state.
    #[must_use]
    pub fn compose(
        snapshot: &StorageInformation,
        recording: &RecordingState,
        media_folder_name: &str,
    ) -> Self {
        let used = (snapshot.total_capacity_mib - snapshot.available_capacity_mib).max(0.0);
        Self {
            video_on: recording.is_recording(),
            photo_interval_on: false,
            used_storage_mib: used,
            available_storage_mib: snapshot.available_capacity_mib,
            total_storage_mib: snapshot.total_capacity_mib,
            recording_time_s: recording.elapsed_s(),
            media_folder_name: media_folder_name.to_string(),
            storage_status: snapshot.state.into(),
            storage_id: snapshot.storage_id,
            storage_type: snapshot.media.into(),
        }
    }
}

/// Latest storage snapshot behind a mutex.
///
/// Each push replaces the snapshot wholesale; readers copy the whole struct
/// out under the same lock, so a read can never mix fields from two pushes.
#[derive(Debug, Clone, Default)]
pub struct StorageCell {
    inner: Arc<Mutex<StorageInformation>>,
}

impl StorageCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot. Invoked from the backend's execution context.
    pub fn push(&self, info: StorageInformation) {
        *self.inner.lock().expect("storage snapshot lock poisoned") = info;
    }

    /// Copy the latest snapshot out.
    #[must_use]
    pub fn snapshot(&self) -> StorageInformation {
        self.inner
            .lock()
            .expect("storage snapshot lock poisoned")
            .clone()
    }

    /// Build the callback handed to the backend subscription. The returned
    /// closure owns a clone of this cell and may outlive the facade call
    /// that created it.
    #[must_use]
    pub fn callback(&self) -> StorageCallback {
        let cell = self.clone();
        Box::new(move |info| cell.push(info))
    }
}

/// Locally tracked video recording state.
///
/// The recording duration is derived from the start instant on every status
/// read, never stored.
#[derive(Debug, Default)]
pub struct RecordingState {
    started: Option<Instant>,
}

impl RecordingState {
    /// Mark a confirmed video start.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Mark a confirmed video stop.
    pub fn stop(&mut self) {
        self.started = None;
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.started.is_some()
    }

    /// Elapsed recording time in seconds; 0 when not recording.
    #[must_use]
    pub fn elapsed_s(&self) -> f32 {
        self.started
            .map_or(0.0, |started| started.elapsed().as_secs_f32())
    }
}
