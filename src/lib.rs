//! Payload camera library - device abstraction over the vendor camera modules.
//!
//! This library exposes the core functionality of the `aircam` CLI for use in
//! tests and by the RPC adapter that bridges the device to flight controllers.
//!
//! # Modules
//!
//! - `device`: Camera facade composing the primary and thermal backends
//! - `backend`: Backend traits, factory symbols, and the in-memory mock
//! - `loader`: Dynamic module loading and backend bring-up
//! - `settings`: Setting registry and option codec tables
//! - `mode`: Capture mode state machine
//! - `status`: Storage snapshot cell and recording timer
//! - `outcome`: Protocol-level operation outcomes
//! - `error`: Error types with user-recoverable hints

pub mod backend;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod loader;
pub mod logging;
pub mod mode;
pub mod outcome;
pub mod settings;
pub mod status;
