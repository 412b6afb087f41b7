//! Runs the flight stabilizer against the simulated airframe.
//!
//! Usage:
//! ```
//! cargo run --bin flight-controller -- --duration 5 --event 2.0:altitude-up --event 3.5:capture
//! ```

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use libm::{cos, sin};
use shared_definitions::controller::InputEvent;

use flight_controller::{
    config::store::{ConfigStorage, FlightConfig},
    control::control_loops::ControlLoop,
    drivers::simulated::{SensorFrame, SimulatedHardware},
    util::math::vectors::{PositionSample, RotationVector3D},
};

const DEFAULT_CONFIG_PATH: &str = "flight_config.json";
const ROLL_SWAY_AMPLITUDE: f64 = 0.05;
const ROLL_SWAY_FREQUENCY_HZ: f64 = 0.5;
const WRITE_HISTORY: usize = 64;

/// Parse a scheduled event in format "seconds:event-name"
fn parse_scheduled_event(s: &str) -> Result<(f64, InputEvent), String> {
    let (time, name) = s
        .split_once(':')
        .ok_or_else(|| "Events must be in format 'seconds:event-name'".to_string())?;
    let time = time
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid event time `{}`", time))?;
    if !time.is_finite() || time < 0.0 {
        return Err("Event time must be a non-negative number of seconds".to_string());
    }
    let event = name.trim().parse::<InputEvent>().map_err(|e| e.to_string())?;
    Ok((time, event))
}

/// Command line arguments for the simulated flight
#[derive(Parser, Debug)]
#[command(
    name = "flight-controller",
    about = "Quadrotor attitude and altitude stabilizer on a simulated airframe",
    long_about = None
)]
struct Args {
    /// JSON flight config, defaults are used when the file does not exist
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory pictures are written to, overrides the config
    #[arg(long)]
    capture_dir: Option<PathBuf>,

    /// Simulated seconds to fly before the host stops the loop
    #[arg(short, long, default_value_t = 5.0)]
    duration: f64,

    /// Tick length in milliseconds, overrides the config
    #[arg(long)]
    timestep_ms: Option<u64>,

    /// Operator events to inject (format: "seconds:event-name", repeatable)
    /// Example: "2.5:altitude-up"
    #[arg(long = "event", value_parser = parse_scheduled_event)]
    events: Vec<(f64, InputEvent)>,

    /// Write the current config (with overrides) back to the config file
    #[arg(long)]
    save_config: bool,
}

fn demo_events() -> Vec<(f64, InputEvent)> {
    vec![
        (1.5, InputEvent::AltitudeUp),
        (1.5, InputEvent::AltitudeUp),
        (2.0, InputEvent::Forward),
        (2.5, InputEvent::TurnLeft),
        (3.0, InputEvent::StrafeRight),
        (3.5, InputEvent::Capture),
        (4.0, InputEvent::AltitudeDown),
    ]
}

/// Airframe swaying gently in roll while hovering at one metre.
fn swaying_airframe(time: f64) -> SensorFrame {
    let phase = 2.0 * PI * ROLL_SWAY_FREQUENCY_HZ * time;
    SensorFrame {
        orientation: RotationVector3D::new(ROLL_SWAY_AMPLITUDE * sin(phase), 0.0, 0.0),
        rate: RotationVector3D::new(
            ROLL_SWAY_AMPLITUDE * 2.0 * PI * ROLL_SWAY_FREQUENCY_HZ * cos(phase),
            0.0,
            0.0,
        ),
        position: PositionSample { altitude: 1.0 },
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let storage = ConfigStorage::new(&args.config);
    let mut config: FlightConfig = storage
        .load_from_file()
        .with_context(|| format!("Failed to load config {:?}", storage.path()))?;
    if let Some(capture_dir) = args.capture_dir {
        config.capture_directory = capture_dir;
    }
    if let Some(timestep_ms) = args.timestep_ms {
        config.timestep_ms = timestep_ms;
    }
    anyhow::ensure!(config.timestep_ms > 0, "Tick length must be at least 1 ms");

    if args.save_config {
        storage.store_to_file(&config)?;
        log::info!("Config saved to {:?}", storage.path());
    }

    std::fs::create_dir_all(&config.capture_directory).with_context(|| {
        format!(
            "Failed to create capture directory {:?}",
            config.capture_directory
        )
    })?;

    let mut hardware = SimulatedHardware::new(config.timestep())
        .with_sensors(swaying_airframe)
        .with_duration(args.duration)
        .with_write_history(WRITE_HISTORY);
    #[cfg(feature = "synthetic-camera")]
    {
        hardware = hardware.with_frame_output(400, 240);
    }

    let events = if args.events.is_empty() {
        demo_events()
    } else {
        args.events
    };
    for (time, event) in events {
        hardware.schedule_event(time, event);
    }

    let mut control_loop =
        ControlLoop::new(hardware, &config).context("Failed to start the flight stabilizer")?;
    log::info!("Pictures go to {:?}", control_loop.capture_directory());
    let stabilizing_ticks = control_loop.run();

    let hardware = control_loop.hardware();
    let telemetry = control_loop.telemetry();
    log::info!(
        "Flight finished: {} stabilizing ticks, {} actuator writes, {} pictures, target altitude {} m",
        stabilizing_ticks,
        hardware.write_count(),
        hardware.captured_photos().len(),
        control_loop.flight_state().target_altitude()
    );
    log::info!(
        "Worst tick {:?}, {} over budget",
        telemetry.max_loop_exec_time(),
        telemetry.overruns()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_event_parsing() {
        assert_eq!(
            parse_scheduled_event("2.5:altitude-up"),
            Ok((2.5, InputEvent::AltitudeUp))
        );
        assert_eq!(
            parse_scheduled_event(" 3 : capture "),
            Ok((3.0, InputEvent::Capture))
        );
        assert!(parse_scheduled_event("capture").is_err());
        assert!(parse_scheduled_event("-1:capture").is_err());
        assert!(parse_scheduled_event("1:hover").is_err());
    }
}
