use libm::floor;

use crate::drivers::hardware_adapter::{FlightActuators, Indicator};
use crate::util::error::FlightError;

/// Front left is lit on odd whole seconds, front right on even ones.
pub fn blink_states(elapsed_time: f64) -> (bool, bool) {
    let led_state = floor(elapsed_time) as i64 % 2 == 1;
    (led_state, !led_state)
}

pub fn update_indicators(
    actuators: &mut impl FlightActuators,
    elapsed_time: f64,
) -> Result<(), FlightError> {
    let (front_left, front_right) = blink_states(elapsed_time);
    actuators.set_indicator(Indicator::FrontLeft, front_left)?;
    actuators.set_indicator(Indicator::FrontRight, front_right)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_every_whole_second() {
        assert_eq!(blink_states(0.0), (false, true));
        assert_eq!(blink_states(0.99), (false, true));
        assert_eq!(blink_states(1.0), (true, false));
        assert_eq!(blink_states(1.5), (true, false));
        assert_eq!(blink_states(2.0), (false, true));
        assert_eq!(blink_states(7.25), (true, false));
    }
}
