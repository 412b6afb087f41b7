use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error("Required device `{0}` is not available")]
    DeviceUnavailable(String),
    #[error("Failed to capture photo {path:?}: {reason}")]
    CaptureFailed { path: PathBuf, reason: String },
    #[error("Failed to set indicator `{0}`")]
    IndicatorWrite(String),
    #[error("Config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
