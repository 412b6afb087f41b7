// Stabilizer gains
pub const VERTICAL_THRUST: f64 = 68.5; // motor velocity that roughly keeps the drone airborne
pub const VERTICAL_OFFSET: f64 = 0.6; // added to the altitude error to bias towards climbing
pub const VERTICAL_P: f64 = 3.0;
pub const ROLL_P: f64 = 50.0;
pub const PITCH_P: f64 = 30.0;

// Saturation limits
pub const MAX_ATTITUDE_INPUT: f64 = 1.0;
pub const MAX_ALTITUDE_ERROR: f64 = 1.0;

// Operator input
pub const PITCH_DISTURBANCE: f64 = 2.0;
pub const YAW_DISTURBANCE: f64 = 1.3;
pub const ROLL_DISTURBANCE: f64 = 1.0;
pub const ALTITUDE_STEP: f64 = 0.05;
pub const INITIAL_TARGET_ALTITUDE: f64 = 1.0;

// Startup
pub const STARTUP_THRESHOLD_S: f64 = 1.0;
pub const STARTUP_MOTOR_VELOCITY: f64 = 1.0;

// Camera gimbal damping
pub const GIMBAL_ROLL_DAMPING: f64 = -0.115;
pub const GIMBAL_PITCH_DAMPING: f64 = -0.1;

// Loop
pub const DEFAULT_TIMESTEP_MS: u64 = 8;
pub const TELEMETRY_INTERVAL_S: f64 = 1.0;

// Camera
pub const DEFAULT_CAPTURE_DIRECTORY: &str = "captures";
pub const CAPTURE_FILE_PREFIX: &str = "drone_picture_";
pub const PHOTO_QUALITY: u8 = 100;
