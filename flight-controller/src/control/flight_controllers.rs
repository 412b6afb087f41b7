use libm::pow;

use crate::config::constants::{MAX_ALTITUDE_ERROR, MAX_ATTITUDE_INPUT};
use crate::config::store::ControllerGains;
use crate::util::math::vectors::{
    OrientationSample, PositionSample, RateSample, RotationVector2D, RotationVector3D,
};

/// State that outlives a single tick. Owned by the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    target_altitude: f64,
}

impl FlightState {
    pub fn new(target_altitude: f64) -> Self {
        FlightState { target_altitude }
    }

    pub fn target_altitude(&self) -> f64 {
        self.target_altitude
    }

    /// Setpoint moves only by operator steps, it is not bounded.
    pub fn step_target_altitude(&mut self, delta: f64) -> f64 {
        self.target_altitude += delta;
        self.target_altitude
    }
}

pub struct AttitudeControllerInput {
    pub measured_rotation: OrientationSample,
    pub measured_rotation_rate: RateSample,
    pub disturbance: RotationVector3D,
}

pub struct AttitudeController {
    roll_gain: f64,
    pitch_gain: f64,
}

impl AttitudeController {
    pub fn new(gains: &ControllerGains) -> Self {
        AttitudeController {
            roll_gain: gains.roll_gain,
            pitch_gain: gains.pitch_gain,
        }
    }

    pub fn get_next_output(&self, input: &AttitudeControllerInput) -> RotationVector2D {
        let roll = input
            .measured_rotation
            .roll
            .clamp(-MAX_ATTITUDE_INPUT, MAX_ATTITUDE_INPUT);
        let pitch = input
            .measured_rotation
            .pitch
            .clamp(-MAX_ATTITUDE_INPUT, MAX_ATTITUDE_INPUT);

        RotationVector2D {
            roll: self.roll_gain * roll
                + input.measured_rotation_rate.roll
                + input.disturbance.roll,
            pitch: self.pitch_gain * pitch
                + input.measured_rotation_rate.pitch
                + input.disturbance.pitch,
        }
    }
}

pub struct AltitudeController {
    vertical_offset: f64,
    vertical_gain: f64,
}

impl AltitudeController {
    pub fn new(gains: &ControllerGains) -> Self {
        AltitudeController {
            vertical_offset: gains.vertical_offset,
            vertical_gain: gains.vertical_gain,
        }
    }

    /// Cubic shaping of the clamped error: soft near the setpoint, strongest
    /// at the clamp limits.
    pub fn get_next_output(&self, measured: &PositionSample, flight_state: &FlightState) -> f64 {
        let clamped_difference_altitude = (flight_state.target_altitude() - measured.altitude
            + self.vertical_offset)
            .clamp(-MAX_ALTITUDE_ERROR, MAX_ALTITUDE_ERROR);
        self.vertical_gain * pow(clamped_difference_altitude, 3.0)
    }
}
