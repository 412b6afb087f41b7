use std::ops::Add;

use crate::util::math::vectors::RotationVector3D;

pub trait FlyingVehicleMovementMapper<TActuator> {
    fn map_controller_output_to_actuators_input(
        &self,
        vertical_input: f64,
        rotation_input: RotationVector3D,
    ) -> TActuator;
}

/// Raw mixer output, before the spin direction sign is applied on write.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MotorCommandSet {
    pub front_left: f64,  //CW
    pub front_right: f64, //CCW
    pub rear_left: f64,   //CCW
    pub rear_right: f64,  //CW
}

impl From<f64> for MotorCommandSet {
    fn from(value: f64) -> Self {
        Self {
            front_left: value,
            front_right: value,
            rear_left: value,
            rear_right: value,
        }
    }
}

impl Add for MotorCommandSet {
    type Output = MotorCommandSet;

    fn add(self, other: Self) -> Self::Output {
        Self {
            front_left: self.front_left + other.front_left,
            front_right: self.front_right + other.front_right,
            rear_left: self.rear_left + other.rear_left,
            rear_right: self.rear_right + other.rear_right,
        }
    }
}

/// Motor mixing for a quadcopter with alternating rotor spin directions.
pub struct Quadcopter {
    thrust_base: f64,
}

impl Quadcopter {
    pub fn new(thrust_base: f64) -> Self {
        Self { thrust_base }
    }

    fn map_roll_to_motor_input(&self, roll_value: f64) -> MotorCommandSet {
        MotorCommandSet {
            front_left: -roll_value,
            front_right: roll_value,
            rear_left: -roll_value,
            rear_right: roll_value,
        }
    }

    fn map_pitch_to_motor_input(&self, pitch_value: f64) -> MotorCommandSet {
        MotorCommandSet {
            front_left: pitch_value,
            front_right: pitch_value,
            rear_left: -pitch_value,
            rear_right: -pitch_value,
        }
    }

    fn map_yaw_to_motor_input(&self, yaw_value: f64) -> MotorCommandSet {
        MotorCommandSet {
            front_left: -yaw_value,
            front_right: yaw_value,
            rear_left: yaw_value,
            rear_right: -yaw_value,
        }
    }
}

impl FlyingVehicleMovementMapper<MotorCommandSet> for Quadcopter {
    fn map_controller_output_to_actuators_input(
        &self,
        vertical_input: f64,
        rotation_input: RotationVector3D,
    ) -> MotorCommandSet {
        let motors_throttle = MotorCommandSet::from(self.thrust_base + vertical_input);
        let roll_input = self.map_roll_to_motor_input(rotation_input.roll);
        let pitch_input = self.map_pitch_to_motor_input(rotation_input.pitch);
        let yaw_input = self.map_yaw_to_motor_input(rotation_input.yaw);
        motors_throttle + roll_input + pitch_input + yaw_input
    }
}
