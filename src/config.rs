//! Configuration for the capture backends.
//!
//! Vendor identity, the driver-settings location, and the negotiated
//! capture mode are injected here rather than compiled in, so tests and
//! embedders can swap them for fake devices.

use crate::errors::CameraError;
use crate::types::CameraFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyecapConfig {
    pub device: DeviceConfig,
    pub capture: CaptureConfig,
}

/// Identity of the supported camera hardware and its vendor driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// USB vendor id of the target camera
    pub vendor_id: u16,
    /// USB product id of the target camera
    pub product_id: u16,
    /// Provider name the vendor's official driver package registers
    pub driver_provider: String,
    /// Where the native-driver passthrough settings are persisted
    pub settings_path: String,
}

/// Capture mode negotiated when a backend opens a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames per second
    pub fps: u32,
    /// Ceiling for the blocking multi-camera retrieve call
    pub retrieve_timeout_ms: u32,
}

impl Default for EyecapConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig {
                vendor_id: 0x1415,
                product_id: 0x2000,
                driver_provider: "Code Laboratories, Inc.".to_string(),
                settings_path: "ps3eye-driver.toml".to_string(),
            },
            capture: CaptureConfig {
                width: 640,
                height: 480,
                fps: 75,
                retrieve_timeout_ms: 2000,
            },
        }
    }
}

impl EyecapConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CameraError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: EyecapConfig = toml::from_str(&contents)
            .map_err(|e| CameraError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CameraError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CameraError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| CameraError::ConfigError(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("eyecap.toml")
    }

    /// Load from default location or create with defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// The capture format backends should negotiate
    pub fn format(&self) -> CameraFormat {
        CameraFormat::new(self.capture.width, self.capture.height, self.capture.fps)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err("Invalid capture resolution".to_string());
        }
        if self.capture.width % 2 != 0 {
            return Err("Capture width must be even for YUV422 sources".to_string());
        }
        if self.capture.fps == 0 || self.capture.fps > 240 {
            return Err("Invalid capture FPS (must be 1-240)".to_string());
        }
        if self.capture.retrieve_timeout_ms == 0 {
            return Err("Retrieve timeout must be non-zero".to_string());
        }
        if self.device.driver_provider.is_empty() {
            return Err("Driver provider name must not be empty".to_string());
        }
        if self.device.settings_path.is_empty() {
            return Err("Settings path must not be empty".to_string());
        }
        Ok(())
    }
}
