use super::vehicle_movement_mappers::MotorCommandSet;
use crate::drivers::hardware_adapter::{FlightActuators, Rotor, SpinDirection};

impl MotorCommandSet {
    pub fn get(&self, rotor: Rotor) -> f64 {
        match rotor {
            Rotor::FrontLeft => self.front_left,
            Rotor::FrontRight => self.front_right,
            Rotor::RearLeft => self.rear_left,
            Rotor::RearRight => self.rear_right,
        }
    }
}

/// Counter-clockwise rotors take the negated velocity, otherwise yaw
/// authority is reversed.
pub fn output_sign(rotor: Rotor) -> f64 {
    match rotor.spin_direction() {
        SpinDirection::Clockwise => 1.0,
        SpinDirection::CounterClockwise => -1.0,
    }
}

pub struct QuadcopterMotorsStateManager {
    applied_velocities: [f64; 4],
}

impl QuadcopterMotorsStateManager {
    pub fn new() -> Self {
        QuadcopterMotorsStateManager {
            applied_velocities: [0.0; 4],
        }
    }

    /// Puts every rotor in free-run at the given velocity, no sign applied.
    pub fn arm(&mut self, actuators: &mut impl FlightActuators, free_run_velocity: f64) {
        for rotor in Rotor::ALL {
            actuators.set_actuator_velocity(rotor, free_run_velocity);
            self.applied_velocities[rotor.index()] = free_run_velocity;
        }
        log::info!("Motors armed at {} rad/s", free_run_velocity);
    }

    pub fn set_motor_power(&mut self, actuators: &mut impl FlightActuators, values: &MotorCommandSet) {
        for rotor in Rotor::ALL {
            let velocity = output_sign(rotor) * values.get(rotor);
            actuators.set_actuator_velocity(rotor, velocity);
            self.applied_velocities[rotor.index()] = velocity;
        }
    }

    pub fn applied_velocity(&self, rotor: Rotor) -> f64 {
        self.applied_velocities[rotor.index()]
    }
}

impl Default for QuadcopterMotorsStateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::drivers::simulated::SimulatedHardware;

    #[test]
    fn counter_clockwise_rotors_are_negated() {
        let mut hardware = SimulatedHardware::new(Duration::from_millis(8));
        let mut motors = QuadcopterMotorsStateManager::new();
        let commands = MotorCommandSet {
            front_left: 64.148,
            front_right: 74.148,
            rear_left: 64.148,
            rear_right: 74.148,
        };

        motors.set_motor_power(&mut hardware, &commands);

        assert_eq!(hardware.motor_velocity(Rotor::FrontLeft), 64.148);
        assert_eq!(hardware.motor_velocity(Rotor::FrontRight), -74.148);
        assert_eq!(hardware.motor_velocity(Rotor::RearLeft), -64.148);
        assert_eq!(hardware.motor_velocity(Rotor::RearRight), 74.148);
        assert_eq!(motors.applied_velocity(Rotor::FrontRight), -74.148);
    }

    #[test]
    fn arming_sets_free_run_on_every_rotor() {
        let mut hardware = SimulatedHardware::new(Duration::from_millis(8));
        let mut motors = QuadcopterMotorsStateManager::new();

        motors.arm(&mut hardware, 1.0);

        for rotor in Rotor::ALL {
            assert_eq!(hardware.motor_velocity(rotor), 1.0);
        }
        assert_eq!(hardware.writes().len(), 4);
    }
}
