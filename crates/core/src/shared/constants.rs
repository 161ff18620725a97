/// Every persisted frame is named `points<sequence number>`, no extension.
pub const FRAME_FILE_PREFIX: &str = "points";

pub const APP_DIR_NAME: &str = "cloudcap";
pub const POINTS_DIR_NAME: &str = "points";

/// Depth frames arrive at roughly 5 Hz from the sensor.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 200;
pub const DEFAULT_POINTS_PER_FRAME: usize = 2048;

pub const SETTINGS_FILE_NAME: &str = "settings.json";
