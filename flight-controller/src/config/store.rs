use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants::{
    ALTITUDE_STEP, DEFAULT_CAPTURE_DIRECTORY, DEFAULT_TIMESTEP_MS, INITIAL_TARGET_ALTITUDE,
    PITCH_P, ROLL_P, STARTUP_MOTOR_VELOCITY, STARTUP_THRESHOLD_S, TELEMETRY_INTERVAL_S,
    VERTICAL_OFFSET, VERTICAL_P, VERTICAL_THRUST,
};
use crate::util::error::FlightError;

/// Gains of the proportional stabilizer. Fixed once the loop is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerGains {
    pub thrust_base: f64,
    pub vertical_offset: f64,
    pub vertical_gain: f64,
    pub roll_gain: f64,
    pub pitch_gain: f64,
}

impl Default for ControllerGains {
    fn default() -> Self {
        Self {
            thrust_base: VERTICAL_THRUST,
            vertical_offset: VERTICAL_OFFSET,
            vertical_gain: VERTICAL_P,
            roll_gain: ROLL_P,
            pitch_gain: PITCH_P,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub gains: ControllerGains,
    pub initial_target_altitude: f64,
    pub altitude_step: f64,
    pub startup_threshold_s: f64,
    pub startup_motor_velocity: f64,
    pub timestep_ms: u64,
    pub capture_directory: PathBuf,
    pub telemetry_interval_s: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            gains: ControllerGains::default(),
            initial_target_altitude: INITIAL_TARGET_ALTITUDE,
            altitude_step: ALTITUDE_STEP,
            startup_threshold_s: STARTUP_THRESHOLD_S,
            startup_motor_velocity: STARTUP_MOTOR_VELOCITY,
            timestep_ms: DEFAULT_TIMESTEP_MS,
            capture_directory: PathBuf::from(DEFAULT_CAPTURE_DIRECTORY),
            telemetry_interval_s: TELEMETRY_INTERVAL_S,
        }
    }
}

impl FlightConfig {
    pub fn timestep(&self) -> Duration {
        Duration::from_millis(self.timestep_ms)
    }
}

/// Reads and writes the flight config as JSON.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_to_file(&self, config: &FlightConfig) -> Result<(), FlightError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, contents)?;
        log::info!("Stored flight config to {:?}", self.path);
        Ok(())
    }

    /// A missing file is not an error, the defaults are used instead.
    pub fn load_from_file(&self) -> Result<FlightConfig, FlightError> {
        if !self.path.exists() {
            log::info!("No config at {:?}, using defaults", self.path);
            return Ok(FlightConfig::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = FlightConfig::default();
        assert_eq!(config.gains.thrust_base, 68.5);
        assert_eq!(config.gains.vertical_offset, 0.6);
        assert_eq!(config.gains.vertical_gain, 3.0);
        assert_eq!(config.gains.roll_gain, 50.0);
        assert_eq!(config.gains.pitch_gain, 30.0);
        assert_eq!(config.altitude_step, 0.05);
        assert_eq!(config.startup_threshold_s, 1.0);
        assert_eq!(config.timestep(), Duration::from_millis(8));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ConfigStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.load_from_file().unwrap(), FlightConfig::default());
    }

    #[test]
    fn stored_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ConfigStorage::new(dir.path().join("nested").join("flight.json"));
        let mut config = FlightConfig::default();
        config.gains.roll_gain = 42.0;
        config.timestep_ms = 16;

        storage.store_to_file(&config).unwrap();

        assert_eq!(storage.load_from_file().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.json");
        fs::write(&path, r#"{ "gains": { "pitch_gain": 12.5 }, "altitude_step": 0.1 }"#).unwrap();

        let config = ConfigStorage::new(&path).load_from_file().unwrap();

        assert_eq!(config.gains.pitch_gain, 12.5);
        assert_eq!(config.gains.roll_gain, 50.0);
        assert_eq!(config.altitude_step, 0.1);
        assert_eq!(config.initial_target_altitude, 1.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.json");
        fs::write(&path, "{ not json").unwrap();

        let result = ConfigStorage::new(&path).load_from_file();

        assert!(matches!(result, Err(FlightError::InvalidConfig(_))));
    }
}
