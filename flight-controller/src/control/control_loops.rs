use std::path::Path;
use std::time::Instant;

use crate::{
    communication_interfaces::controller::{ControlCommandSet, InputTranslator},
    config::store::FlightConfig,
    control::flight_controllers::{
        AltitudeController, AttitudeController, AttitudeControllerInput, FlightState,
    },
    drivers::hardware_adapter::{HardwareAdapter, Rotor},
    output::{
        camera::PhotoCapture,
        gimbal::{GimbalCommand, GimbalStabilizer},
        indicators::update_indicators,
        motors_state_manager::QuadcopterMotorsStateManager,
        vehicle_movement_mappers::{FlyingVehicleMovementMapper, MotorCommandSet, Quadcopter},
    },
    shared_core_values::StopHandle,
    telemetry::FlightTelemetry,
    util::{error::FlightError, math::vectors::RotationVector3D},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Startup,
    Stabilizing,
    Terminated,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlightStabilizerOut {
    pub commands: ControlCommandSet,
    pub rotation_output_command: RotationVector3D,
    pub vertical_input: f64,
    /// Mixer output before the spin direction sign is applied.
    pub motor_commands: MotorCommandSet,
    pub gimbal: GimbalCommand,
}

const KEY_MAP: &str = "You can control the drone with your computer keyboard:
- 'up': move forward.
- 'down': move backward.
- 'right': turn right.
- 'left': turn left.
- 'shift + up': increase the target altitude.
- 'shift + down': decrease the target altitude.
- 'shift + right': strafe right.
- 'shift + left': strafe left.
- 'p': take a picture.";

/// Fixed timestep stabilizer. Holds the rotors in free-run until the
/// startup threshold has passed, then runs the full pipeline once per tick
/// until the host stops advancing time or a stop is requested.
pub struct ControlLoop<H: HardwareAdapter> {
    hardware: H,
    state: LoopState,
    flight_state: FlightState,
    startup_threshold_s: f64,
    input_translator: InputTranslator,
    attitude_controller: AttitudeController,
    altitude_controller: AltitudeController,
    mixer: Quadcopter,
    motors_manager: QuadcopterMotorsStateManager,
    gimbal: GimbalStabilizer,
    photo_capture: PhotoCapture,
    telemetry: FlightTelemetry,
    stop_handle: StopHandle,
    stabilizing_ticks: u64,
    last_output: Option<FlightStabilizerOut>,
}

impl<H: HardwareAdapter> ControlLoop<H> {
    pub fn new(mut hardware: H, config: &FlightConfig) -> Result<Self, FlightError> {
        hardware.initialize()?;

        let mut motors_manager = QuadcopterMotorsStateManager::new();
        motors_manager.arm(&mut hardware, config.startup_motor_velocity);

        log::info!(
            "Stabilizer ready, tick {:?}, holding until {} s",
            hardware.timestep(),
            config.startup_threshold_s
        );

        Ok(ControlLoop {
            hardware,
            state: LoopState::Startup,
            flight_state: FlightState::new(config.initial_target_altitude),
            startup_threshold_s: config.startup_threshold_s,
            input_translator: InputTranslator::new(config.altitude_step),
            attitude_controller: AttitudeController::new(&config.gains),
            altitude_controller: AltitudeController::new(&config.gains),
            mixer: Quadcopter::new(config.gains.thrust_base),
            motors_manager,
            gimbal: GimbalStabilizer::default(),
            photo_capture: PhotoCapture::new(config.capture_directory.clone()),
            telemetry: FlightTelemetry::new(config.telemetry_interval_s),
            stop_handle: StopHandle::new(),
            stabilizing_ticks: 0,
            last_output: None,
        })
    }

    /// Runs until terminated. Returns how many stabilizing ticks were executed.
    pub fn run(&mut self) -> u64 {
        while self.step() != LoopState::Terminated {}
        self.stabilizing_ticks
    }

    /// One tick boundary: checks for termination, advances simulated time and
    /// then does the work of the current state.
    pub fn step(&mut self) -> LoopState {
        if self.state == LoopState::Terminated {
            return self.state;
        }
        if self.stop_handle.is_stop_requested() {
            self.terminate("stop requested");
            return self.state;
        }
        if !self.hardware.advance_timestep() {
            self.terminate("simulation ended");
            return self.state;
        }

        match self.state {
            LoopState::Startup => {
                if self.hardware.elapsed_time() > self.startup_threshold_s {
                    self.state = LoopState::Stabilizing;
                    log::info!("{}", KEY_MAP);
                }
            }
            LoopState::Stabilizing => {
                self.stabilize_tick();
                self.stabilizing_ticks += 1;
            }
            LoopState::Terminated => {}
        }
        self.state
    }

    fn terminate(&mut self, reason: &str) {
        self.state = LoopState::Terminated;
        log::info!(
            "Control loop terminated ({}) after {} stabilizing ticks",
            reason,
            self.stabilizing_ticks
        );
    }

    fn stabilize_tick(&mut self) {
        let started = Instant::now();
        let budget = self.hardware.timestep();
        let elapsed_time = self.hardware.elapsed_time();

        let measured_rotation = self.hardware.read_orientation();
        let measured_rotation_rate = self.hardware.read_rate();
        let position = self.hardware.read_position();

        let events = self.hardware.poll_input_events();
        let commands = self.input_translator.translate(events, &mut self.flight_state);

        let attitude_output = self
            .attitude_controller
            .get_next_output(&AttitudeControllerInput {
                measured_rotation,
                measured_rotation_rate,
                disturbance: commands.disturbance,
            });
        let vertical_input = self
            .altitude_controller
            .get_next_output(&position, &self.flight_state);

        let rotation_output_command =
            RotationVector3D::from(&attitude_output, commands.disturbance.yaw);
        let motor_commands = self
            .mixer
            .map_controller_output_to_actuators_input(vertical_input, rotation_output_command);
        self.motors_manager
            .set_motor_power(&mut self.hardware, &motor_commands);

        let gimbal = self.gimbal.get_next_output(&measured_rotation_rate);
        self.gimbal.apply(&mut self.hardware, &gimbal);

        let indicators_started = Instant::now();
        if let Err(error) = update_indicators(&mut self.hardware, elapsed_time) {
            log::warn!("Indicator update skipped: {}", error);
        } else if indicators_started.elapsed() > budget {
            log::warn!("Indicator update took {:?}", indicators_started.elapsed());
        }

        if commands.capture_requested {
            self.photo_capture.take_picture(&mut self.hardware, budget);
        }

        let output = FlightStabilizerOut {
            commands,
            rotation_output_command,
            vertical_input,
            motor_commands,
            gimbal,
        };
        self.last_output = Some(output);
        self.telemetry
            .record_tick(elapsed_time, started.elapsed(), budget, output);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn flight_state(&self) -> &FlightState {
        &self.flight_state
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn into_hardware(self) -> H {
        self.hardware
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    pub fn stabilizing_ticks(&self) -> u64 {
        self.stabilizing_ticks
    }

    pub fn last_output(&self) -> Option<&FlightStabilizerOut> {
        self.last_output.as_ref()
    }

    pub fn telemetry(&self) -> &FlightTelemetry {
        &self.telemetry
    }

    pub fn capture_directory(&self) -> &Path {
        self.photo_capture.capture_directory()
    }

    /// Velocities last sent to the rotors, sign included.
    pub fn motor_velocities(&self) -> MotorCommandSet {
        MotorCommandSet {
            front_left: self.motors_manager.applied_velocity(Rotor::FrontLeft),
            front_right: self.motors_manager.applied_velocity(Rotor::FrontRight),
            rear_left: self.motors_manager.applied_velocity(Rotor::RearLeft),
            rear_right: self.motors_manager.applied_velocity(Rotor::RearRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::drivers::simulated::{ActuatorWrite, SimulatedHardware};

    fn control_loop(tick_ms: u64) -> ControlLoop<SimulatedHardware> {
        let hardware = SimulatedHardware::new(Duration::from_millis(tick_ms));
        ControlLoop::new(hardware, &FlightConfig::default()).unwrap()
    }

    #[test]
    fn starts_armed_in_startup() {
        let control_loop = control_loop(8);
        assert_eq!(control_loop.state(), LoopState::Startup);
        assert!(control_loop.hardware().is_initialized());
        assert_eq!(control_loop.motor_velocities(), MotorCommandSet::from(1.0));
        assert_eq!(control_loop.flight_state().target_altitude(), 1.0);
    }

    #[test]
    fn threshold_must_be_exceeded() {
        let mut control_loop = control_loop(500);
        assert_eq!(control_loop.step(), LoopState::Startup); // 0.5 s
        assert_eq!(control_loop.step(), LoopState::Startup); // 1.0 s
        assert_eq!(control_loop.step(), LoopState::Stabilizing); // 1.5 s
        assert!(control_loop.last_output().is_none());
        assert_eq!(control_loop.hardware().writes().len(), 4);

        control_loop.step();
        assert_eq!(control_loop.stabilizing_ticks(), 1);
        assert!(control_loop.last_output().is_some());
    }

    #[test]
    fn telemetry_counts_stabilizing_ticks() {
        let mut control_loop = control_loop(500);
        for _ in 0..5 {
            control_loop.step();
        }
        assert_eq!(control_loop.stabilizing_ticks(), 2);
        assert_eq!(control_loop.telemetry().tick_count(), 2);
        assert_eq!(
            control_loop.telemetry().last_output(),
            control_loop.last_output()
        );
    }

    #[test]
    fn captures_go_to_the_configured_directory() {
        let config = FlightConfig {
            capture_directory: "pictures".into(),
            ..FlightConfig::default()
        };
        let hardware = SimulatedHardware::new(Duration::from_millis(8));
        let control_loop = ControlLoop::new(hardware, &config).unwrap();
        assert_eq!(control_loop.capture_directory(), Path::new("pictures"));
    }

    #[test]
    fn terminated_is_final() {
        let mut control_loop = control_loop(500);
        control_loop.stop_handle().request_stop();
        assert_eq!(control_loop.step(), LoopState::Terminated);
        assert_eq!(control_loop.step(), LoopState::Terminated);
        assert_eq!(control_loop.hardware().steps(), 0);
        assert!(control_loop
            .hardware()
            .writes()
            .iter()
            .all(|write| matches!(write, ActuatorWrite::MotorVelocity { velocity, .. } if *velocity == 1.0)));
    }
}
