//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::mode::Mode;

/// Payload camera CLI - drive the vendor camera modules from the shell.
///
/// Robot Mode: use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "aircam", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "AIRCAM_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose diagnostics (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Primary camera module path (overrides AIRCAM_PRIMARY_MODULE)
    #[arg(long, short = 'm', global = true, value_name = "PATH")]
    pub module: Option<PathBuf>,

    /// Thermal extension module path (overrides AIRCAM_THERMAL_MODULE)
    #[arg(long, global = true, value_name = "PATH")]
    pub thermal_module: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Bring-up & descriptors ===
    /// Load the camera modules and report what came up
    Probe,

    /// Show device information
    Info,

    /// Show storage and recording status
    Status,

    /// Show or switch the capture mode
    Mode(ModeArgs),

    // === Settings ===
    /// List current settings
    Settings,

    /// Read one setting
    GetSetting(GetSettingArgs),

    /// Apply one setting
    SetSetting(SetSettingArgs),

    // === Capture ===
    /// Trigger one still capture
    Photo,

    /// Start or stop video recording
    Video(VideoArgs),

    /// Describe the preview video stream
    StreamInfo,

    // === Maintenance ===
    /// Format a storage volume
    Format(FormatArgs),

    /// Reset settings to their defaults
    Reset,

    /// Sync the device wall clock
    SetTime(SetTimeArgs),

    // === Utilities ===
    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct ModeArgs {
    /// Target mode; omit to show the current mode
    pub target: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Photo,
    Video,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Photo => Self::Photo,
            ModeArg::Video => Self::Video,
        }
    }
}

#[derive(Parser, Debug)]
pub struct GetSettingArgs {
    /// Setting identifier (e.g. CAM_ISO)
    #[arg(value_name = "SETTING_ID")]
    pub setting_id: String,
}

#[derive(Parser, Debug)]
pub struct SetSettingArgs {
    /// Setting identifier (e.g. CAM_ISO)
    #[arg(value_name = "SETTING_ID")]
    pub setting_id: String,

    /// Option value (e.g. 800)
    #[arg(value_name = "OPTION_ID")]
    pub option_id: String,
}

#[derive(Parser, Debug)]
pub struct VideoArgs {
    /// Recording action
    pub action: VideoAction,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VideoAction {
    Start,
    Stop,
}

#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Storage volume id
    #[arg(default_value_t = 0)]
    pub storage_id: i32,
}

#[derive(Parser, Debug)]
pub struct SetTimeArgs {
    /// RFC 3339 timestamp (e.g. 2025-06-01T12:00:00Z); defaults to now
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
