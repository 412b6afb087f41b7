use crate::config::constants::{GIMBAL_PITCH_DAMPING, GIMBAL_ROLL_DAMPING};
use crate::drivers::hardware_adapter::{FlightActuators, GimbalAxis};
use crate::util::math::vectors::RateSample;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GimbalCommand {
    pub roll_position: f64,
    pub pitch_position: f64,
}

/// Counter-rotates the camera mount against the airframe angular rate.
pub struct GimbalStabilizer {
    roll_damping: f64,
    pitch_damping: f64,
}

impl GimbalStabilizer {
    pub fn new(roll_damping: f64, pitch_damping: f64) -> Self {
        GimbalStabilizer {
            roll_damping,
            pitch_damping,
        }
    }

    pub fn get_next_output(&self, rotation_rate: &RateSample) -> GimbalCommand {
        GimbalCommand {
            roll_position: self.roll_damping * rotation_rate.roll,
            pitch_position: self.pitch_damping * rotation_rate.pitch,
        }
    }

    pub fn apply(&self, actuators: &mut impl FlightActuators, command: &GimbalCommand) {
        actuators.set_gimbal_position(GimbalAxis::Roll, command.roll_position);
        actuators.set_gimbal_position(GimbalAxis::Pitch, command.pitch_position);
    }
}

impl Default for GimbalStabilizer {
    fn default() -> Self {
        Self::new(GIMBAL_ROLL_DAMPING, GIMBAL_PITCH_DAMPING)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::util::math::vectors::RotationVector3D;

    #[test]
    fn damps_roll_and_pitch_rates() {
        let gimbal = GimbalStabilizer::default();
        let command = gimbal.get_next_output(&RotationVector3D::new(2.0, -3.0, 7.0));
        assert_relative_eq!(command.roll_position, -0.23);
        assert_relative_eq!(command.pitch_position, 0.3);
    }

    #[test]
    fn still_airframe_centers_gimbal() {
        let gimbal = GimbalStabilizer::default();
        let command = gimbal.get_next_output(&RotationVector3D::default());
        assert_eq!(command.roll_position, 0.0);
        assert_eq!(command.pitch_position, 0.0);
    }
}
