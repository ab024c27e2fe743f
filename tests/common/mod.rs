//! Common test utilities for the payload camera CLI.
//!
//! This module provides infrastructure for facade and end-to-end testing with:
//! - `cli`: CLI runner with output verification and fluent assertions
//! - `rig`: Mock-backed camera assemblies
#![allow(dead_code)]

pub mod cli;
pub mod rig;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
