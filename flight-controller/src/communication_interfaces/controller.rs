use shared_definitions::controller::InputEvent;

use crate::config::constants::{PITCH_DISTURBANCE, ROLL_DISTURBANCE, YAW_DISTURBANCE};
use crate::control::flight_controllers::FlightState;
use crate::util::math::vectors::RotationVector3D;

/// Operator intent for a single tick. Rebuilt from scratch every tick.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ControlCommandSet {
    pub disturbance: RotationVector3D,
    pub altitude_delta: f64,
    pub capture_requested: bool,
}

pub struct InputTranslator {
    altitude_step: f64,
}

impl InputTranslator {
    pub fn new(altitude_step: f64) -> Self {
        InputTranslator { altitude_step }
    }

    /// Later events overwrite the disturbance set by earlier ones on the same
    /// axis. Altitude steps are applied to the setpoint as they are seen.
    pub fn translate(
        &self,
        events: impl IntoIterator<Item = InputEvent>,
        flight_state: &mut FlightState,
    ) -> ControlCommandSet {
        let mut commands = ControlCommandSet::default();
        for event in events {
            match event {
                InputEvent::Forward => commands.disturbance.pitch = -PITCH_DISTURBANCE,
                InputEvent::Backward => commands.disturbance.pitch = PITCH_DISTURBANCE,
                InputEvent::TurnRight => commands.disturbance.yaw = -YAW_DISTURBANCE,
                InputEvent::TurnLeft => commands.disturbance.yaw = YAW_DISTURBANCE,
                InputEvent::StrafeRight => commands.disturbance.roll = -ROLL_DISTURBANCE,
                InputEvent::StrafeLeft => commands.disturbance.roll = ROLL_DISTURBANCE,
                InputEvent::AltitudeUp => {
                    commands.altitude_delta += self.altitude_step;
                    let target = flight_state.step_target_altitude(self.altitude_step);
                    log::info!("Target altitude: {} m", target);
                }
                InputEvent::AltitudeDown => {
                    commands.altitude_delta -= self.altitude_step;
                    let target = flight_state.step_target_altitude(-self.altitude_step);
                    log::info!("Target altitude: {} m", target);
                }
                InputEvent::Capture => commands.capture_requested = true,
                InputEvent::Unrecognized(code) => {
                    log::trace!("Ignoring unrecognized key {}", code);
                }
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn translate(events: Vec<InputEvent>, state: &mut FlightState) -> ControlCommandSet {
        InputTranslator::new(0.05).translate(events, state)
    }

    #[test]
    fn no_events_is_neutral() {
        let mut state = FlightState::new(1.0);
        let commands = translate(vec![], &mut state);
        assert_eq!(commands, ControlCommandSet::default());
        assert_eq!(state.target_altitude(), 1.0);
    }

    #[test]
    fn movement_events_set_disturbances() {
        let mut state = FlightState::new(1.0);
        let cases = [
            (InputEvent::Forward, RotationVector3D::new(0.0, -2.0, 0.0)),
            (InputEvent::Backward, RotationVector3D::new(0.0, 2.0, 0.0)),
            (InputEvent::TurnRight, RotationVector3D::new(0.0, 0.0, -1.3)),
            (InputEvent::TurnLeft, RotationVector3D::new(0.0, 0.0, 1.3)),
            (InputEvent::StrafeRight, RotationVector3D::new(-1.0, 0.0, 0.0)),
            (InputEvent::StrafeLeft, RotationVector3D::new(1.0, 0.0, 0.0)),
        ];
        for (event, expected) in cases {
            let commands = translate(vec![event], &mut state);
            assert_eq!(commands.disturbance, expected, "{}", event);
            assert!(!commands.capture_requested);
        }
        assert_eq!(state.target_altitude(), 1.0);
    }

    #[test]
    fn last_event_on_an_axis_wins() {
        let mut state = FlightState::new(1.0);
        let commands = translate(
            vec![
                InputEvent::Forward,
                InputEvent::TurnLeft,
                InputEvent::Backward,
            ],
            &mut state,
        );
        assert_eq!(commands.disturbance, RotationVector3D::new(0.0, 2.0, 1.3));
    }

    #[test]
    fn altitude_steps_accumulate() {
        let mut state = FlightState::new(1.0);
        let commands = translate(vec![InputEvent::AltitudeUp; 3], &mut state);
        assert_relative_eq!(state.target_altitude(), 1.15, epsilon = 1e-12);
        assert_relative_eq!(commands.altitude_delta, 0.15, epsilon = 1e-12);

        let commands = translate(
            vec![InputEvent::AltitudeDown, InputEvent::AltitudeUp, InputEvent::AltitudeDown],
            &mut state,
        );
        assert_relative_eq!(state.target_altitude(), 1.1, epsilon = 1e-12);
        assert_relative_eq!(commands.altitude_delta, -0.05, epsilon = 1e-12);
    }

    #[test]
    fn capture_is_a_flag() {
        let mut state = FlightState::new(1.0);
        let commands = translate(vec![InputEvent::Capture, InputEvent::Capture], &mut state);
        assert!(commands.capture_requested);
        assert_eq!(commands.disturbance, RotationVector3D::default());
    }

    #[test]
    fn unrecognized_events_are_ignored() {
        let mut state = FlightState::new(1.0);
        let commands = translate(
            vec![InputEvent::Unrecognized(65), InputEvent::Unrecognized(0)],
            &mut state,
        );
        assert_eq!(commands, ControlCommandSet::default());
        assert_eq!(state.target_altitude(), 1.0);
    }
}
