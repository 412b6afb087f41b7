use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::constants::CAPTURE_FILE_PREFIX;
use crate::drivers::hardware_adapter::Camera;
use crate::util::time::get_current_unix_time_seconds;

pub fn capture_file_path(capture_directory: &Path, unix_time_seconds: u64) -> PathBuf {
    capture_directory.join(format!("{}{}.jpg", CAPTURE_FILE_PREFIX, unix_time_seconds))
}

/// Best-effort photo capture. Failures and slow captures are logged and the
/// request is dropped, never retried.
pub struct PhotoCapture {
    capture_directory: PathBuf,
}

impl PhotoCapture {
    pub fn new(capture_directory: impl Into<PathBuf>) -> Self {
        PhotoCapture {
            capture_directory: capture_directory.into(),
        }
    }

    pub fn capture_directory(&self) -> &Path {
        &self.capture_directory
    }

    pub fn take_picture(&self, camera: &mut impl Camera, tick_budget: Duration) -> Option<PathBuf> {
        let path = capture_file_path(&self.capture_directory, get_current_unix_time_seconds());
        let started = Instant::now();
        let result = camera.capture_photo(&path);
        let elapsed = started.elapsed();

        if elapsed > tick_budget {
            log::warn!(
                "Capture took {:?}, longer than the {:?} tick",
                elapsed,
                tick_budget
            );
        }

        match result {
            Ok(()) => {
                log::info!("Picture saved as {:?}", path);
                Some(path)
            }
            Err(error) => {
                log::warn!("Dropped capture: {}", error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::drivers::simulated::SimulatedHardware;

    #[test]
    fn file_name_carries_unix_time() {
        let path = capture_file_path(Path::new("pictures"), 1_700_000_000);
        assert_eq!(path, Path::new("pictures").join("drone_picture_1700000000.jpg"));
    }

    #[test]
    fn successful_capture_returns_path() {
        let mut hardware = SimulatedHardware::new(Duration::from_millis(8));
        let capture = PhotoCapture::new("pictures");

        let path = capture
            .take_picture(&mut hardware, Duration::from_millis(8))
            .unwrap();

        assert!(path.starts_with("pictures"));
        assert_eq!(hardware.captured_photos(), &[path]);
    }

    #[test]
    fn failed_capture_is_dropped() {
        let mut hardware = SimulatedHardware::new(Duration::from_millis(8)).with_failing_camera();
        let capture = PhotoCapture::new("pictures");

        assert!(capture
            .take_picture(&mut hardware, Duration::from_millis(8))
            .is_none());
        assert!(hardware.captured_photos().is_empty());
    }
}
