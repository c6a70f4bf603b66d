use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    DeviceUnavailable(String),
    SdkFailure(String),
    ConfigError(String),
    SettingsError(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            CameraError::SdkFailure(msg) => write!(f, "Vendor SDK failure: {}", msg),
            CameraError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            CameraError::SettingsError(msg) => write!(f, "Driver settings error: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
