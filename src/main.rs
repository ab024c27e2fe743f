//! Payload camera CLI - drive the vendor camera modules from the shell.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces
//! over the same device facade the RPC adapter uses.

use std::io::{self, IsTerminal};

use chrono::{DateTime, Utc};
use clap::Parser;
use console::style;
use serde::Serialize;

use aircam::cli::{self, Cli, Commands, VideoAction};
use aircam::config::Config;
use aircam::device::Camera;
use aircam::error::{CamError, Result};
use aircam::logging;
use aircam::mode::Mode;
use aircam::outcome::Outcome;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }

    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            output_error(&cli, &err);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Probe) => cmd_probe(cli),
        Some(Commands::Info) => cmd_info(cli),
        Some(Commands::Status) => cmd_status(cli),
        Some(Commands::Mode(args)) => cmd_mode(cli, args),
        Some(Commands::Settings) => cmd_settings(cli),
        Some(Commands::GetSetting(args)) => cmd_get_setting(cli, args),
        Some(Commands::SetSetting(args)) => cmd_set_setting(cli, args),
        Some(Commands::Photo) => cmd_photo(cli),
        Some(Commands::Video(args)) => cmd_video(cli, args),
        Some(Commands::StreamInfo) => cmd_stream_info(cli),
        Some(Commands::Format(args)) => cmd_format(cli, args),
        Some(Commands::Reset) => cmd_reset(cli),
        Some(Commands::SetTime(args)) => cmd_set_time(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<i32> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(0)
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "aircam",
        version: build_info::VERSION,
        description: "Payload camera CLI over the vendor backend modules",
        discovery: RobotDiscovery {
            probe_modules: "aircam probe --robot",
            device_info: "aircam info --robot",
            storage_status: "aircam status --robot",
            stream_info: "aircam stream-info --robot",
        },
        capture: RobotCapture {
            take_photo: "aircam photo",
            start_video: "aircam video start",
            stop_video: "aircam video stop",
            switch_mode: "aircam mode <photo|video>",
        },
        settings: RobotSettings {
            list: "aircam settings --robot",
            get: "aircam get-setting <SETTING_ID>",
            set: "aircam set-setting <SETTING_ID> <OPTION_ID>",
            reset: "aircam reset",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        modules: "Override module paths with --module / --thermal-module or \
                  AIRCAM_PRIMARY_MODULE / AIRCAM_THERMAL_MODULE",
    };

    println!("{}", serde_json::to_string_pretty(&help).unwrap());
}

fn print_human_quick_start() {
    println!(
        "{} {} - Payload camera CLI\n",
        style("aircam").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();

    println!("  {}  Load modules and report", style("aircam probe").green());
    println!("  {}  Device information", style("aircam info").green());
    println!("  {}  Storage and recording status", style("aircam status").green());
    println!("  {}  Switch capture mode", style("aircam mode video").green());
    println!("  {}  Trigger a photo", style("aircam photo").green());
    println!("  {}  Start recording", style("aircam video start").green());
    println!("  {}  List settings", style("aircam settings").green());
    println!("  {}  Apply a setting", style("aircam set-setting CAM_ISO 800").green());
    println!();

    println!("{}", style("ROBOT MODE (for agents and scripts)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("aircam --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("aircam --robot").cyan());
    println!();

    println!("{}", style("MODULES").bold().underlined());
    println!();
    println!(
        "  Override module paths with {} / {}",
        style("--module").yellow(),
        style("--thermal-module").yellow()
    );
    println!("  or AIRCAM_PRIMARY_MODULE / AIRCAM_THERMAL_MODULE");
    println!();

    println!("Run {} for full help", style("aircam --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    discovery: RobotDiscovery,
    capture: RobotCapture,
    settings: RobotSettings,
    output_modes: OutputModes,
    modules: &'static str,
}

#[derive(Serialize)]
struct RobotDiscovery {
    probe_modules: &'static str,
    device_info: &'static str,
    storage_status: &'static str,
    stream_info: &'static str,
}

#[derive(Serialize)]
struct RobotCapture {
    take_photo: &'static str,
    start_video: &'static str,
    stop_video: &'static str,
    switch_mode: &'static str,
}

#[derive(Serialize)]
struct RobotSettings {
    list: &'static str,
    get: &'static str,
    set: &'static str,
    reset: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn device_config(cli: &Cli) -> Config {
    Config::from_env().with_modules(cli.module.clone(), cli.thermal_module.clone())
}

/// Build the device and run the full bring-up; CLI commands are one-shot,
/// so every invocation prepares its own device.
fn prepared_camera(cli: &Cli) -> Result<Camera> {
    let mut camera = Camera::new(device_config(cli));
    camera.try_prepare()?;
    Ok(camera)
}

#[derive(Serialize)]
struct ProbeReport {
    primary_module: String,
    thermal_module: String,
    thermal_loaded: bool,
    mode: Mode,
    settings_seeded: usize,
}

fn cmd_probe(cli: &Cli) -> Result<i32> {
    let config = device_config(cli);
    let report_primary = config.primary_module.display().to_string();
    let report_thermal = config.thermal_module.display().to_string();
    let mut camera = Camera::new(config);
    camera.try_prepare()?;

    let report = ProbeReport {
        primary_module: report_primary,
        thermal_module: report_thermal,
        thermal_loaded: camera.thermal_available(),
        mode: camera.mode(),
        settings_seeded: camera.current_settings().len(),
    };
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "probe", Outcome::Success, &report);
    } else {
        println!("{}: {}", style("Primary module").bold(), report.primary_module);
        println!("{}: {}", style("Thermal module").bold(), report.thermal_module);
        println!(
            "{}: {}",
            style("Thermal loaded").bold(),
            if report.thermal_loaded { "yes" } else { "no" }
        );
        println!("{}: {}", style("Mode").bold(), report.mode);
        println!("{}: {}", style("Settings seeded").bold(), report.settings_seeded);
    }
    Ok(0)
}

fn cmd_info(cli: &Cli) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let info = camera.information();
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "info", Outcome::Success, &info);
    } else {
        println!("{}: {}", style("Vendor").bold(), info.vendor_name);
        println!("{}: {}", style("Model").bold(), info.model_name);
        println!("{}: {}", style("Firmware").bold(), info.firmware_version);
        println!("{}: {} mm", style("Focal length").bold(), info.focal_length_mm);
        println!(
            "{}: {}x{} mm",
            style("Sensor size").bold(),
            info.horizontal_sensor_size_mm,
            info.vertical_sensor_size_mm
        );
        println!(
            "{}: {}x{} px",
            style("Resolution").bold(),
            info.horizontal_resolution_px,
            info.vertical_resolution_px
        );
        println!(
            "{}: {} (v{})",
            style("Definition file").bold(),
            if info.definition_file_uri.is_empty() {
                "-"
            } else {
                &info.definition_file_uri
            },
            info.definition_file_version
        );
    }
    Ok(0)
}

fn cmd_status(cli: &Cli) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let status = camera.status();
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "status", Outcome::Success, &status);
    } else {
        println!("{}: {:?}", style("Storage status").bold(), status.storage_status);
        println!("{}: {:?}", style("Storage type").bold(), status.storage_type);
        println!(
            "{}: {:.1} / {:.1} MiB used",
            style("Storage").bold(),
            status.used_storage_mib,
            status.total_storage_mib
        );
        println!(
            "{}: {:.1} MiB",
            style("Available").bold(),
            status.available_storage_mib
        );
        if status.video_on {
            println!(
                "{}: recording for {:.0}s",
                style("Video").bold(),
                status.recording_time_s
            );
        } else {
            println!("{}: off", style("Video").bold());
        }
        if !status.media_folder_name.is_empty() {
            println!("{}: {}", style("Media folder").bold(), status.media_folder_name);
        }
    }
    Ok(0)
}

fn cmd_mode(cli: &Cli, args: &cli::ModeArgs) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;

    let Some(target) = args.target else {
        let mode = camera.mode();
        camera.close();
        if cli.use_json() {
            output_envelope(cli, "mode", Outcome::Success, &serde_json::json!({ "mode": mode }));
        } else {
            println!("{}: {}", style("Mode").bold(), mode);
        }
        return Ok(0);
    };

    let target = Mode::from(target);
    let outcome = camera.set_mode(target);
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "mode", outcome, &serde_json::json!({ "mode": target }));
    } else if !cli.quiet {
        print_outcome_line(&format!("Switch to {target}"), outcome);
    }
    Ok(exit_code(outcome))
}

fn cmd_settings(cli: &Cli) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let current = camera.current_settings();
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "settings", Outcome::Success, &current);
    } else if current.is_empty() {
        println!("{}", style("No settings seeded").yellow());
    } else {
        for setting in &current {
            println!(
                "{} = {}",
                style(&setting.setting_id).green(),
                setting.option.option_id
            );
        }
    }
    Ok(0)
}

fn cmd_get_setting(cli: &Cli, args: &cli::GetSettingArgs) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let (outcome, setting) = camera.get_setting(&args.setting_id);
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "get-setting", outcome, &setting);
    } else if outcome.is_success() {
        println!(
            "{} = {}",
            style(&setting.setting_id).green(),
            setting.option.option_id
        );
    } else if !cli.quiet {
        print_outcome_line(&format!("Get {}", args.setting_id), outcome);
    }
    Ok(exit_code(outcome))
}

fn cmd_set_setting(cli: &Cli, args: &cli::SetSettingArgs) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let outcome = camera.set_setting(&args.setting_id, &args.option_id);
    camera.close();

    if cli.use_json() {
        output_envelope(
            cli,
            "set-setting",
            outcome,
            &serde_json::json!({
                "setting_id": args.setting_id,
                "option_id": args.option_id,
            }),
        );
    } else if !cli.quiet {
        print_outcome_line(
            &format!("Set {} = {}", args.setting_id, args.option_id),
            outcome,
        );
    }
    Ok(exit_code(outcome))
}

fn cmd_photo(cli: &Cli) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let outcome = camera.take_photo();
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "photo", outcome, &serde_json::Value::Null);
    } else if !cli.quiet {
        print_outcome_line("Photo capture", outcome);
    }
    Ok(exit_code(outcome))
}

fn cmd_video(cli: &Cli, args: &cli::VideoArgs) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let (command, outcome) = match args.action {
        VideoAction::Start => ("video-start", camera.start_video()),
        VideoAction::Stop => ("video-stop", camera.stop_video()),
    };
    camera.close();

    if cli.use_json() {
        output_envelope(cli, command, outcome, &serde_json::Value::Null);
    } else if !cli.quiet {
        let action = match args.action {
            VideoAction::Start => "Video start",
            VideoAction::Stop => "Video stop",
        };
        print_outcome_line(action, outcome);
    }
    Ok(exit_code(outcome))
}

fn cmd_stream_info(cli: &Cli) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let stream = camera.video_stream_info();
    camera.close();

    let Some(info) = stream else {
        let outcome = Outcome::NoSystem;
        if cli.use_json() {
            output_envelope(cli, "stream-info", outcome, &serde_json::Value::Null);
        } else if !cli.quiet {
            print_outcome_line("Stream info", outcome);
        }
        return Ok(exit_code(outcome));
    };

    if cli.use_json() {
        output_envelope(cli, "stream-info", Outcome::Success, &info);
    } else {
        println!("{}: {}", style("URI").bold(), info.uri);
        println!(
            "{}: {}x{} px",
            style("Resolution").bold(),
            info.horizontal_resolution_px,
            info.vertical_resolution_px
        );
        println!("{}: {} fps", style("Framerate").bold(), info.frame_rate_hz);
        println!("{}: {:?}", style("Status").bold(), info.status);
        println!("{}: {:?}", style("Spectrum").bold(), info.spectrum);
    }
    Ok(0)
}

fn cmd_format(cli: &Cli, args: &cli::FormatArgs) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let outcome = camera.format_storage(args.storage_id);
    camera.close();

    if cli.use_json() {
        output_envelope(
            cli,
            "format",
            outcome,
            &serde_json::json!({ "storage_id": args.storage_id }),
        );
    } else if !cli.quiet {
        print_outcome_line(&format!("Format storage {}", args.storage_id), outcome);
    }
    Ok(exit_code(outcome))
}

fn cmd_reset(cli: &Cli) -> Result<i32> {
    let mut camera = prepared_camera(cli)?;
    let outcome = camera.reset_settings();
    camera.close();

    if cli.use_json() {
        output_envelope(cli, "reset", outcome, &serde_json::Value::Null);
    } else if !cli.quiet {
        print_outcome_line("Reset settings", outcome);
    }
    Ok(exit_code(outcome))
}

fn cmd_set_time(cli: &Cli, args: &cli::SetTimeArgs) -> Result<i32> {
    let epoch_ms = match &args.at {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map_err(|_| CamError::InvalidTimestamp {
                value: value.clone(),
            })?
            .timestamp_millis(),
        None => Utc::now().timestamp_millis(),
    };

    let mut camera = prepared_camera(cli)?;
    let outcome = camera.set_timestamp(epoch_ms);
    camera.close();

    if cli.use_json() {
        output_envelope(
            cli,
            "set-time",
            outcome,
            &serde_json::json!({ "epoch_ms": epoch_ms }),
        );
    } else if !cli.quiet {
        print_outcome_line("Clock sync", outcome);
    }
    Ok(exit_code(outcome))
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<i32> {
    if cli.use_json() {
        print_json(cli, &serde_json::json!({ "version": build_info::VERSION }));
    } else {
        println!("aircam {}", build_info::VERSION);
    }
    Ok(0)
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<i32> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "aircam", &mut io::stdout());
    Ok(0)
}

// === Utility Functions ===

const fn exit_code(outcome: Outcome) -> i32 {
    if outcome.is_success() {
        0
    } else {
        1
    }
}

fn print_outcome_line(action: &str, outcome: Outcome) {
    if outcome.is_success() {
        println!("{}: {}", action, style(outcome.label()).green());
    } else {
        println!("{}: {}", action, style(outcome.label()).red().bold());
    }
}

fn output_envelope<T: Serialize>(cli: &Cli, command: &str, outcome: Outcome, data: &T) {
    let data = serde_json::to_value(data).unwrap_or(serde_json::Value::Null);
    let envelope = serde_json::json!({
        "ok": outcome.is_success(),
        "command": command,
        "outcome": outcome,
        "data": data,
    });
    print_json(cli, &envelope);
}

fn print_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data).unwrap()
    } else {
        serde_json::to_string_pretty(data).unwrap()
    };
    println!("{json}");
}

fn output_error(cli: &Cli, error: &CamError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "ok": false,
            "error": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
