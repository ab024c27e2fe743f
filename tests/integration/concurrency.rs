//! Storage snapshot consistency under concurrent pushes.
//!
//! The backend delivers storage updates from its own thread while facade
//! callers read status synchronously. These tests hammer that seam and check
//! that a reader can never observe fields mixed from two different pushes.

use std::thread;

use aircam::backend::{MediaKind, StorageInformation, StorageState};
use aircam::status::StorageCell;

use crate::common::init_test_logging;
use crate::common::rig::prepared_camera;

/// A push whose fields are all derived from one sequence number, so torn
/// reads are detectable from any two fields.
fn correlated_push(seq: i32) -> StorageInformation {
    #[allow(clippy::cast_precision_loss)]
    let available = seq as f32;
    StorageInformation {
        storage_id: seq,
        available_capacity_mib: available,
        total_capacity_mib: available * 2.0,
        state: StorageState::Ready,
        media: MediaKind::MicroSd,
    }
}

fn assert_consistent(info: &StorageInformation) {
    #[allow(clippy::cast_precision_loss)]
    let expected_available = info.storage_id as f32;
    assert_eq!(
        info.available_capacity_mib, expected_available,
        "snapshot mixes fields from different pushes: {info:?}"
    );
    assert_eq!(
        info.total_capacity_mib,
        expected_available * 2.0,
        "snapshot mixes fields from different pushes: {info:?}"
    );
}

/// One backend thread pushing through the subscription while the facade
/// reads status from the caller thread.
#[test]
fn status_reads_never_tear_across_pushes() {
    init_test_logging();
    let (camera, handle) = prepared_camera();

    let writer = thread::spawn(move || {
        for seq in 1..=1000 {
            assert!(handle.push_storage(correlated_push(seq)));
        }
    });

    loop {
        let status = camera.status();
        #[allow(clippy::cast_precision_loss)]
        let expected_available = status.storage_id as f32;
        assert_eq!(status.available_storage_mib, expected_available);
        assert_eq!(status.total_storage_mib, expected_available * 2.0);
        assert_eq!(status.used_storage_mib, expected_available);
        if status.storage_id == 1000 {
            break;
        }
    }

    writer.join().expect("writer thread panicked");
    assert_eq!(camera.status().storage_id, 1000);
}

/// Several producers racing on the raw cell; every snapshot a reader copies
/// out must be one producer's push in its entirety.
#[test]
fn cell_snapshots_are_whole_under_racing_writers() {
    init_test_logging();
    let cell = StorageCell::new();

    let writers: Vec<_> = (0..4)
        .map(|lane| {
            let callback = cell.callback();
            thread::spawn(move || {
                for round in 0..250 {
                    callback(correlated_push(lane * 1000 + round + 1));
                }
            })
        })
        .collect();

    for _ in 0..2000 {
        let snapshot = cell.snapshot();
        if snapshot.storage_id == 0 {
            // Nothing pushed yet.
            continue;
        }
        assert_consistent(&snapshot);
    }

    for writer in writers {
        writer.join().expect("writer thread panicked");
    }
    assert_consistent(&cell.snapshot());
}
