use std::path::Path;
use std::time::Duration;

use shared_definitions::controller::InputEvent;

use crate::util::{
    error::FlightError,
    math::vectors::{OrientationSample, PositionSample, RateSample},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotor {
    FrontLeft,  //CW
    FrontRight, //CCW
    RearLeft,   //CCW
    RearRight,  //CW
}

impl Rotor {
    pub const ALL: [Rotor; 4] = [
        Rotor::FrontLeft,
        Rotor::FrontRight,
        Rotor::RearLeft,
        Rotor::RearRight,
    ];

    pub fn device_name(&self) -> &'static str {
        match self {
            Rotor::FrontLeft => "front left propeller",
            Rotor::FrontRight => "front right propeller",
            Rotor::RearLeft => "rear left propeller",
            Rotor::RearRight => "rear right propeller",
        }
    }

    pub fn spin_direction(&self) -> SpinDirection {
        match self {
            Rotor::FrontLeft | Rotor::RearRight => SpinDirection::Clockwise,
            Rotor::FrontRight | Rotor::RearLeft => SpinDirection::CounterClockwise,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Rotor::FrontLeft => 0,
            Rotor::FrontRight => 1,
            Rotor::RearLeft => 2,
            Rotor::RearRight => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GimbalAxis {
    Roll,
    Pitch,
}

impl GimbalAxis {
    pub fn device_name(&self) -> &'static str {
        match self {
            GimbalAxis::Roll => "camera roll",
            GimbalAxis::Pitch => "camera pitch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    FrontLeft,
    FrontRight,
}

impl Indicator {
    pub fn device_name(&self) -> &'static str {
        match self {
            Indicator::FrontLeft => "front left led",
            Indicator::FrontRight => "front right led",
        }
    }
}

pub const INERTIAL_UNIT_DEVICE: &str = "inertial unit";
pub const GPS_DEVICE: &str = "gps";
pub const GYRO_DEVICE: &str = "gyro";
pub const CAMERA_DEVICE: &str = "camera";
pub const KEYBOARD_DEVICE: &str = "keyboard";

/// Every device the stabilizer needs before the loop may start.
pub fn required_devices() -> Vec<&'static str> {
    let mut devices = vec![
        INERTIAL_UNIT_DEVICE,
        GPS_DEVICE,
        GYRO_DEVICE,
        CAMERA_DEVICE,
        KEYBOARD_DEVICE,
    ];
    devices.extend(Rotor::ALL.iter().map(Rotor::device_name));
    devices.extend([GimbalAxis::Roll, GimbalAxis::Pitch].iter().map(GimbalAxis::device_name));
    devices.extend(
        [Indicator::FrontLeft, Indicator::FrontRight]
            .iter()
            .map(Indicator::device_name),
    );
    devices
}

pub trait AttitudeSensor {
    fn read_orientation(&mut self) -> OrientationSample;
    fn read_rate(&mut self) -> RateSample;
}

pub trait PositionSensor {
    fn read_position(&mut self) -> PositionSample;
}

pub trait InputSource {
    /// Returns every event pending since the last call, never blocks.
    fn poll_input_events(&mut self) -> Vec<InputEvent>;
}

pub trait FlightActuators {
    fn set_actuator_velocity(&mut self, rotor: Rotor, velocity: f64);
    fn set_gimbal_position(&mut self, axis: GimbalAxis, position: f64);
    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<(), FlightError>;
}

pub trait Camera {
    fn capture_photo(&mut self, path: &Path) -> Result<(), FlightError>;
}

/// Host runtime seen by the control loop. The host owns the timestep,
/// `advance_timestep` is the only place the loop yields to it.
pub trait HardwareAdapter:
    AttitudeSensor + PositionSensor + InputSource + FlightActuators + Camera
{
    /// Enables sensors and puts rotors into velocity mode.
    fn initialize(&mut self) -> Result<(), FlightError>;
    fn elapsed_time(&self) -> f64;
    fn timestep(&self) -> Duration;
    /// Returns false once the host wants the loop to stop.
    fn advance_timestep(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_rotors_share_spin_direction() {
        assert_eq!(
            Rotor::FrontLeft.spin_direction(),
            Rotor::RearRight.spin_direction()
        );
        assert_eq!(
            Rotor::FrontRight.spin_direction(),
            Rotor::RearLeft.spin_direction()
        );
        assert_ne!(
            Rotor::FrontLeft.spin_direction(),
            Rotor::FrontRight.spin_direction()
        );
    }

    #[test]
    fn rotor_indices_are_distinct() {
        let mut indices: Vec<usize> = Rotor::ALL.iter().map(Rotor::index).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn required_devices_cover_all_actuators() {
        let devices = required_devices();
        assert_eq!(devices.len(), 13);
        assert!(devices.contains(&"rear right propeller"));
        assert!(devices.contains(&"camera pitch"));
        assert!(devices.contains(&"front right led"));
    }
}
