//! Vendor SDK seams.
//!
//! The vendor camera libraries are external collaborators: this crate
//! defines the trait surface each adapter drives and ships fakes for
//! testing (see [`crate::testing`]). Real FFI bindings implement these
//! traits downstream.

pub mod multicam;
pub mod usb;

pub use multicam::{CameraHandle, CameraParam, CameraUuid, ColorMode, MulticamSdk, Resolution};
pub use usb::{UsbEyeDevice, UsbEyeSdk, UsbFrame};

use std::fmt;

/// Failure reported by a vendor SDK call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// The device disappeared or was never there.
    Unavailable(String),
    /// A blocking call ran out its timeout without a frame.
    Timeout,
    /// Any other rejection from the vendor library.
    Failed(String),
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SdkError::Unavailable(msg) => write!(f, "device unavailable: {}", msg),
            SdkError::Timeout => write!(f, "timed out waiting for frame"),
            SdkError::Failed(msg) => write!(f, "SDK call failed: {}", msg),
        }
    }
}

impl std::error::Error for SdkError {}
