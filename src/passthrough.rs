//! Property path for the native-driver passthrough mode.
//!
//! When the vendor's own OS driver is detected, frame capture belongs
//! to the host pipeline's built-in path and no adapter is produced.
//! Exposure and gain are still adjustable: the driver reads them from
//! its per-user settings storage, which [`PassthroughControls`] edits
//! directly. All other properties answer `None` here and stay with the
//! host capture.

use crate::settings::SettingsStore;
use crate::types::CaptureProperty;

/// Driver-settings-backed property access.
///
/// Reads and writes use the driver's raw ranges: exposure raw
/// `[0, 511]` maps to the normalized `[0, 255]` via halving, gain raw
/// `[0, 79]` maps via `256/79`. A value of 0 written to either property
/// re-enables the corresponding automatic mode, and an enabled
/// automatic mode reads back as 0.
pub struct PassthroughControls {
    store: Box<dyn SettingsStore>,
}

impl PassthroughControls {
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Controls backed by the TOML store at the configured path.
    pub fn from_config(config: &crate::config::EyecapConfig) -> Self {
        Self::new(Box::new(crate::settings::TomlSettingsStore::new(
            &config.device.settings_path,
        )))
    }

    /// Read a property through the driver settings.
    ///
    /// `None` means the property is not driver-backed and the host
    /// capture path should answer instead. Storage failures are logged
    /// and read as 0, the same sentinel the contract uses elsewhere.
    pub fn property(&self, property: CaptureProperty) -> Option<f64> {
        match property {
            CaptureProperty::Exposure | CaptureProperty::Gain => {}
            _ => return None,
        }

        let settings = match self.store.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return Some(0.0);
            }
        };

        Some(match property {
            CaptureProperty::Exposure => {
                if settings.auto_exposure {
                    0.0
                } else {
                    settings.exposure as f64 / 2.0
                }
            }
            CaptureProperty::Gain => {
                if settings.auto_gain {
                    0.0
                } else {
                    settings.gain as f64 * (256.0 / 79.0)
                }
            }
            _ => unreachable!(),
        })
    }

    /// Write a property through the driver settings.
    ///
    /// `None` means the property is not driver-backed. On success the
    /// driver picks the new values up only when the host capture is
    /// reopened; the caller owns that restart. Storage failures are
    /// logged and report false.
    pub fn set_property(&self, property: CaptureProperty, value: f64) -> Option<bool> {
        match property {
            CaptureProperty::Exposure | CaptureProperty::Gain => {}
            _ => return None,
        }

        let mut settings = match self.store.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return Some(false);
            }
        };

        match property {
            CaptureProperty::Exposure => {
                settings.auto_exposure = value == 0.0;
                settings.exposure = ((value * 2.0) as i64 % 511) as u32;
            }
            CaptureProperty::Gain => {
                settings.auto_gain = value == 0.0;
                settings.gain = ((value * 79.0 / 256.0).ceil() as i64 % 79) as u32;
            }
            _ => unreachable!(),
        }

        if let Err(e) = self.store.save(&settings) {
            log::error!("{}", e);
            return Some(false);
        }

        log::info!("Driver parameter changed; the capture device must be reopened to apply it");
        Some(true)
    }
}
