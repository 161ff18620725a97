use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cloudcap_core::encoding::domain::point_encoding::PointEncoding;
use cloudcap_core::shared::constants::{
    APP_DIR_NAME, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_POINTS_PER_FRAME, SETTINGS_FILE_NAME,
};
use cloudcap_core::shared::point_stride::PointStride;

/// Consecutive failed writes after which capture is stopped.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingSetting {
    Text,
    Binary,
}

impl From<EncodingSetting> for PointEncoding {
    fn from(setting: EncodingSetting) -> Self {
        match setting {
            EncodingSetting::Text => PointEncoding::Text,
            EncodingSetting::Binary => PointEncoding::Binary,
        }
    }
}

impl From<PointEncoding> for EncodingSetting {
    fn from(encoding: PointEncoding) -> Self {
        match encoding {
            PointEncoding::Text => EncodingSetting::Text,
            PointEncoding::Binary => EncodingSetting::Binary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub encoding: EncodingSetting,
    /// Values per point: 3 (xyz) or 4 (xyz + confidence).
    pub stride: usize,
    /// `None` = per-user application data directory.
    pub output_dir: Option<PathBuf>,
    pub points_per_frame: usize,
    pub frame_interval_ms: u64,
    /// 0 disables the stop-on-failure policy.
    pub max_consecutive_failures: u32,
    pub sync_writes: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            encoding: EncodingSetting::Text,
            stride: PointStride::default().values_per_point(),
            output_dir: None,
            points_per_frame: DEFAULT_POINTS_PER_FRAME,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            sync_writes: true,
        }
    }
}

impl CaptureSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads from the user config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        match Self::config_path() {
            Some(path) => {
                if let Err(e) = self.save_to(&path) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            None => log::warn!("Could not determine config directory; settings not saved"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn point_stride(&self) -> Result<PointStride, String> {
        PointStride::from_values_per_point(self.stride)
            .ok_or_else(|| format!("Stride must be 3 or 4, got {}", self.stride))
    }
}
