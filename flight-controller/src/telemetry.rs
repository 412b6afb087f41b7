use std::time::Duration;

use crate::control::control_loops::FlightStabilizerOut;

/// Loop timing and the most recent stabilizer output. Reported to the log
/// once per interval of simulated time.
pub struct FlightTelemetry {
    report_interval_s: f64,
    last_report_time: Option<f64>,
    tick_count: u64,
    loop_exec_time: Duration,
    max_loop_exec_time: Duration,
    overruns: u64,
    last_output: Option<FlightStabilizerOut>,
}

impl FlightTelemetry {
    pub fn new(report_interval_s: f64) -> Self {
        FlightTelemetry {
            report_interval_s,
            last_report_time: None,
            tick_count: 0,
            loop_exec_time: Duration::ZERO,
            max_loop_exec_time: Duration::ZERO,
            overruns: 0,
            last_output: None,
        }
    }

    /// Returns true when this tick produced a log report.
    pub fn record_tick(
        &mut self,
        elapsed_time: f64,
        exec_time: Duration,
        budget: Duration,
        output: FlightStabilizerOut,
    ) -> bool {
        self.tick_count += 1;
        self.loop_exec_time = exec_time;
        self.max_loop_exec_time = self.max_loop_exec_time.max(exec_time);
        if exec_time > budget {
            self.overruns += 1;
            log::debug!("Tick took {:?}, budget is {:?}", exec_time, budget);
        }
        self.last_output = Some(output);

        let report_due = match self.last_report_time {
            Some(last) => elapsed_time - last >= self.report_interval_s,
            None => true,
        };
        if report_due {
            self.last_report_time = Some(elapsed_time);
            self.report(elapsed_time);
        }
        report_due
    }

    fn report(&self, elapsed_time: f64) {
        let Some(output) = self.last_output.as_ref() else {
            return;
        };
        log::info!(
            "
                Time: {:.3} s
                Iteration Time: {:?} (max {:?}, overruns {})
                Rotation input {:?}
                Vertical input {:.4}
                Motor {:?}",
            elapsed_time,
            self.loop_exec_time,
            self.max_loop_exec_time,
            self.overruns,
            output.rotation_output_command,
            output.vertical_input,
            [
                output.motor_commands.front_left,
                output.motor_commands.front_right,
                output.motor_commands.rear_left,
                output.motor_commands.rear_right,
            ],
        );
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn loop_exec_time(&self) -> Duration {
        self.loop_exec_time
    }

    pub fn max_loop_exec_time(&self) -> Duration {
        self.max_loop_exec_time
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn last_output(&self) -> Option<&FlightStabilizerOut> {
        self.last_output.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(telemetry: &mut FlightTelemetry, time: f64, exec_ms: u64) -> bool {
        telemetry.record_tick(
            time,
            Duration::from_millis(exec_ms),
            Duration::from_millis(8),
            FlightStabilizerOut::default(),
        )
    }

    #[test]
    fn reports_once_per_interval() {
        let mut telemetry = FlightTelemetry::new(1.0);
        assert!(record(&mut telemetry, 1.25, 1));
        assert!(!record(&mut telemetry, 1.5, 1));
        assert!(!record(&mut telemetry, 2.0, 1));
        assert!(record(&mut telemetry, 2.25, 1));
        assert_eq!(telemetry.tick_count(), 4);
    }

    #[test]
    fn tracks_overruns_and_worst_tick() {
        let mut telemetry = FlightTelemetry::new(1.0);
        record(&mut telemetry, 0.0, 3);
        record(&mut telemetry, 0.1, 12);
        record(&mut telemetry, 0.2, 5);

        assert_eq!(telemetry.overruns(), 1);
        assert_eq!(telemetry.loop_exec_time(), Duration::from_millis(5));
        assert_eq!(telemetry.max_loop_exec_time(), Duration::from_millis(12));
        assert!(telemetry.last_output().is_some());
    }
}
