//! Persistent application settings (JSON file in the platform data
//! directory, overridable from the command line).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sonalyze_core::EndpointConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    /// Directory `load` reads `<name>.wav` files from.
    pub input_dir: PathBuf,
    /// Directory plot exports and saved waves are written to.
    pub output_dir: PathBuf,
    /// Energy-classification window width in milliseconds.
    pub window_ms: f64,
    /// Hysteresis: noise gaps shorter than this many samples between
    /// speech bursts are bridged.
    pub bridge_gap: usize,
    /// Hysteresis: speech bursts shorter than this many samples between
    /// noise spans are suppressed.
    pub suppress_burst: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            window_ms: 10.0,
            bridge_gap: 500,
            suppress_burst: 5_000,
        }
    }
}

impl AppSettings {
    /// Clamp out-of-range values instead of failing on a hand-edited file.
    pub fn normalize(&mut self) {
        if !self.window_ms.is_finite() || self.window_ms <= 0.0 {
            self.window_ms = 10.0;
        }
        self.window_ms = self.window_ms.clamp(0.1, 1_000.0);
    }

    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig {
            window_ms: self.window_ms,
            bridge_gap: self.bridge_gap,
            suppress_burst: self.suppress_burst,
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Sonalyze")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("sonalyze")
            .join("settings.json")
    }
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
