use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock seconds since the unix epoch, used to stamp captured photos.
pub fn get_current_unix_time_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
