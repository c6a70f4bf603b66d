//! Persisted driver settings for the native-driver passthrough mode.
//!
//! The vendor's own driver reads its exposure and gain configuration
//! from per-user storage rather than from an SDK handle. This module
//! owns that storage behind [`SettingsStore`]; the file-backed
//! implementation persists TOML at the path named in the device
//! configuration.

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw driver settings, stored in the driver's native ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSettings {
    /// Automatic exposure control flag (AEC).
    pub auto_exposure: bool,
    /// Raw exposure value applied when AEC is off.
    pub exposure: u32,
    /// Automatic gain control flag (AGC).
    pub auto_gain: bool,
    /// Raw gain value applied when AGC is off.
    pub gain: u32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            auto_exposure: true,
            exposure: 120,
            auto_gain: true,
            gain: 20,
        }
    }
}

/// Storage seam for [`DriverSettings`].
///
/// A load failure means the vendor's configuration tool has not run for
/// this user yet; callers report it and fall back to sentinel values
/// rather than failing hard.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<DriverSettings, CameraError>;
    fn save(&self, settings: &DriverSettings) -> Result<(), CameraError>;
}

/// TOML-file-backed settings store.
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<DriverSettings, CameraError> {
        if !self.path.exists() {
            return Err(CameraError::SettingsError(format!(
                "No driver settings at {:?}; the vendor configuration tool must run at least once",
                self.path
            )));
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            CameraError::SettingsError(format!("Failed to read driver settings: {}", e))
        })?;

        toml::from_str(&contents).map_err(|e| {
            CameraError::SettingsError(format!("Failed to parse driver settings: {}", e))
        })
    }

    fn save(&self, settings: &DriverSettings) -> Result<(), CameraError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CameraError::SettingsError(format!(
                        "Failed to create settings directory: {}",
                        e
                    ))
                })?;
            }
        }

        let toml_string = toml::to_string_pretty(settings).map_err(|e| {
            CameraError::SettingsError(format!("Failed to serialize driver settings: {}", e))
        })?;

        fs::write(&self.path, toml_string).map_err(|e| {
            CameraError::SettingsError(format!("Failed to write driver settings: {}", e))
        })
    }
}
