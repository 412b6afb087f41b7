/// Roll/pitch/yaw triple. Used for attitude in radians and for angular rates
/// in radians per second.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RotationVector3D {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

pub type OrientationSample = RotationVector3D;
pub type RateSample = RotationVector3D;

impl RotationVector3D {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        RotationVector3D { roll, pitch, yaw }
    }

    pub fn from(vector_2d: &RotationVector2D, yaw: f64) -> Self {
        RotationVector3D {
            roll: vector_2d.roll,
            pitch: vector_2d.pitch,
            yaw,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RotationVector2D {
    pub roll: f64,
    pub pitch: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub altitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_is_attached_to_roll_pitch() {
        let attitude = RotationVector2D {
            roll: 0.1,
            pitch: -0.2,
        };
        assert_eq!(
            RotationVector3D::from(&attitude, 0.3),
            RotationVector3D::new(0.1, -0.2, 0.3)
        );
    }
}
