use std::path::{Path, PathBuf};
use std::time::Duration;

use shared_definitions::controller::InputEvent;

use super::hardware_adapter::{
    required_devices, AttitudeSensor, Camera, FlightActuators, GimbalAxis, HardwareAdapter,
    Indicator, InputSource, PositionSensor, Rotor,
};
use crate::util::{
    error::FlightError,
    math::vectors::{OrientationSample, PositionSample, RateSample},
};

const NANOS_IN_SECOND: f64 = 1_000_000_000.0;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SensorFrame {
    pub orientation: OrientationSample,
    pub rate: RateSample,
    pub position: PositionSample,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorWrite {
    MotorVelocity {
        time: f64,
        rotor: Rotor,
        velocity: f64,
    },
    GimbalPosition {
        time: f64,
        axis: GimbalAxis,
        position: f64,
    },
    Indicator {
        time: f64,
        indicator: Indicator,
        on: bool,
    },
}

impl ActuatorWrite {
    pub fn time(&self) -> f64 {
        match self {
            ActuatorWrite::MotorVelocity { time, .. }
            | ActuatorWrite::GimbalPosition { time, .. }
            | ActuatorWrite::Indicator { time, .. } => *time,
        }
    }
}

/// Deterministic stand-in for the simulator runtime. Sensor frames come from
/// a script indexed by elapsed time, events are released once their time is
/// reached and every actuator write is recorded.
pub struct SimulatedHardware {
    timestep: Duration,
    steps: u64,
    max_steps: Option<u64>,
    sensors: Box<dyn FnMut(f64) -> SensorFrame + Send>,
    current_frame: Option<(u64, SensorFrame)>,
    scheduled_events: Vec<(f64, InputEvent)>,
    next_event: usize,
    missing_devices: Vec<String>,
    failing_camera: bool,
    failing_indicators: bool,
    #[cfg(feature = "synthetic-camera")]
    frame_size: Option<(u32, u32)>,
    initialized: bool,
    motor_velocities: [f64; 4],
    gimbal_positions: [f64; 2],
    indicators: [bool; 2],
    writes: Vec<ActuatorWrite>,
    write_count: u64,
    write_history_limit: Option<usize>,
    captured_photos: Vec<PathBuf>,
}

impl SimulatedHardware {
    pub fn new(timestep: Duration) -> Self {
        SimulatedHardware {
            timestep,
            steps: 0,
            max_steps: None,
            sensors: Box::new(|_| SensorFrame::default()),
            current_frame: None,
            scheduled_events: Vec::new(),
            next_event: 0,
            missing_devices: Vec::new(),
            failing_camera: false,
            failing_indicators: false,
            #[cfg(feature = "synthetic-camera")]
            frame_size: None,
            initialized: false,
            motor_velocities: [0.0; 4],
            gimbal_positions: [0.0; 2],
            indicators: [false; 2],
            writes: Vec::new(),
            write_count: 0,
            write_history_limit: None,
            captured_photos: Vec::new(),
        }
    }

    pub fn with_sensors(mut self, sensors: impl FnMut(f64) -> SensorFrame + Send + 'static) -> Self {
        self.sensors = Box::new(sensors);
        self
    }

    pub fn with_constant_sensors(self, frame: SensorFrame) -> Self {
        self.with_sensors(move |_| frame)
    }

    /// Host stops the loop after this much simulated time.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        let steps = (seconds * NANOS_IN_SECOND / self.timestep.as_nanos() as f64).ceil();
        self.max_steps = Some(steps.max(0.0) as u64);
        self
    }

    pub fn without_device(mut self, device_name: &str) -> Self {
        self.missing_devices.push(device_name.to_string());
        self
    }

    pub fn with_failing_camera(mut self) -> Self {
        self.failing_camera = true;
        self
    }

    pub fn with_failing_indicators(mut self) -> Self {
        self.failing_indicators = true;
        self
    }

    /// Captures write a synthetic JPEG of this size instead of only being recorded.
    #[cfg(feature = "synthetic-camera")]
    pub fn with_frame_output(mut self, width: u32, height: u32) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    /// Keeps only the most recent writes. Long runs otherwise record every
    /// write for the whole flight.
    pub fn with_write_history(mut self, limit: usize) -> Self {
        self.write_history_limit = Some(limit);
        self
    }

    /// Events scheduled for the same time keep their insertion order.
    pub fn schedule_event(&mut self, at_seconds: f64, event: InputEvent) {
        let position = self
            .scheduled_events
            .partition_point(|(time, _)| *time <= at_seconds);
        self.scheduled_events.insert(position, (at_seconds, event));
    }

    pub fn schedule_key_press(&mut self, at_seconds: f64, key_code: u32) {
        self.schedule_event(at_seconds, InputEvent::from_key_code(key_code));
    }

    pub fn motor_velocity(&self, rotor: Rotor) -> f64 {
        self.motor_velocities[rotor.index()]
    }

    pub fn gimbal_position(&self, axis: GimbalAxis) -> f64 {
        match axis {
            GimbalAxis::Roll => self.gimbal_positions[0],
            GimbalAxis::Pitch => self.gimbal_positions[1],
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::FrontLeft => self.indicators[0],
            Indicator::FrontRight => self.indicators[1],
        }
    }

    pub fn writes(&self) -> &[ActuatorWrite] {
        &self.writes
    }

    /// Every write since construction, including the ones dropped from history.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn captured_photos(&self) -> &[PathBuf] {
        &self.captured_photos
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn frame(&mut self) -> SensorFrame {
        match self.current_frame {
            Some((step, frame)) if step == self.steps => frame,
            _ => {
                let now = self.elapsed_time();
                let frame = (self.sensors)(now);
                self.current_frame = Some((self.steps, frame));
                frame
            }
        }
    }

    fn record(&mut self, write: ActuatorWrite) {
        self.write_count += 1;
        self.writes.push(write);
        if let Some(limit) = self.write_history_limit {
            if self.writes.len() > limit {
                let excess = self.writes.len() - limit;
                self.writes.drain(..excess);
            }
        }
    }

    #[cfg(feature = "synthetic-camera")]
    fn write_synthetic_frame(&self, path: &Path, width: u32, height: u32) -> Result<(), FlightError> {
        use image::codecs::jpeg::JpegEncoder;
        use std::{fs::File, io::BufWriter};

        use crate::config::constants::PHOTO_QUALITY;

        let capture_error = |reason: String| FlightError::CaptureFailed {
            path: path.to_path_buf(),
            reason,
        };
        let shade = (self.steps % 256) as u8;
        let frame = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, shade])
        });
        let file = File::create(path).map_err(|e| capture_error(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, PHOTO_QUALITY);
        encoder
            .encode_image(&frame)
            .map_err(|e| capture_error(e.to_string()))
    }
}

impl AttitudeSensor for SimulatedHardware {
    fn read_orientation(&mut self) -> OrientationSample {
        self.frame().orientation
    }

    fn read_rate(&mut self) -> RateSample {
        self.frame().rate
    }
}

impl PositionSensor for SimulatedHardware {
    fn read_position(&mut self) -> PositionSample {
        self.frame().position
    }
}

impl InputSource for SimulatedHardware {
    fn poll_input_events(&mut self) -> Vec<InputEvent> {
        let now = self.elapsed_time();
        let pending = self.scheduled_events[self.next_event..]
            .iter()
            .take_while(|(time, _)| *time <= now)
            .map(|(_, event)| *event)
            .collect::<Vec<_>>();
        self.next_event += pending.len();
        pending
    }
}

impl FlightActuators for SimulatedHardware {
    fn set_actuator_velocity(&mut self, rotor: Rotor, velocity: f64) {
        self.motor_velocities[rotor.index()] = velocity;
        let time = self.elapsed_time();
        self.record(ActuatorWrite::MotorVelocity {
            time,
            rotor,
            velocity,
        });
    }

    fn set_gimbal_position(&mut self, axis: GimbalAxis, position: f64) {
        match axis {
            GimbalAxis::Roll => self.gimbal_positions[0] = position,
            GimbalAxis::Pitch => self.gimbal_positions[1] = position,
        }
        let time = self.elapsed_time();
        self.record(ActuatorWrite::GimbalPosition {
            time,
            axis,
            position,
        });
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<(), FlightError> {
        if self.failing_indicators {
            return Err(FlightError::IndicatorWrite(indicator.device_name().to_string()));
        }
        match indicator {
            Indicator::FrontLeft => self.indicators[0] = on,
            Indicator::FrontRight => self.indicators[1] = on,
        }
        let time = self.elapsed_time();
        self.record(ActuatorWrite::Indicator {
            time,
            indicator,
            on,
        });
        Ok(())
    }
}

impl Camera for SimulatedHardware {
    fn capture_photo(&mut self, path: &Path) -> Result<(), FlightError> {
        if self.failing_camera {
            return Err(FlightError::CaptureFailed {
                path: path.to_path_buf(),
                reason: "camera did not respond".to_string(),
            });
        }
        #[cfg(feature = "synthetic-camera")]
        if let Some((width, height)) = self.frame_size {
            self.write_synthetic_frame(path, width, height)?;
        }
        self.captured_photos.push(path.to_path_buf());
        Ok(())
    }
}

impl HardwareAdapter for SimulatedHardware {
    fn initialize(&mut self) -> Result<(), FlightError> {
        if let Some(missing) = required_devices()
            .into_iter()
            .find(|device| self.missing_devices.iter().any(|m| m == device))
        {
            return Err(FlightError::DeviceUnavailable(missing.to_string()));
        }
        self.initialized = true;
        Ok(())
    }

    fn elapsed_time(&self) -> f64 {
        (self.steps as u128 * self.timestep.as_nanos()) as f64 / NANOS_IN_SECOND
    }

    fn timestep(&self) -> Duration {
        self.timestep
    }

    fn advance_timestep(&mut self) -> bool {
        if let Some(max_steps) = self.max_steps {
            if self.steps >= max_steps {
                return false;
            }
        }
        self.steps += 1;
        true
    }
}
