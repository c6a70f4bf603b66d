//! eyecap: PS3 Eye camera capture adapters for computer-vision pipelines
//!
//! This crate adapts two vendor camera SDK surfaces (a multi-camera DLL
//! and a USB-driver-level library) to one capture capability trait, so a
//! vision pipeline can grab BGR frames and tune camera controls without
//! caring which vendor stack owns the device.
//!
//! # Features
//! - Runtime-registered backend factory table with priority-order
//!   device opening and preferred-backend index encoding
//! - Normalized camera controls mapped to each SDK's native ranges
//! - Fixed-point BT.601 YUV422 to BGR conversion
//! - Native-driver detection with a settings-backed passthrough
//!   property path
//! - Scriptable SDK fakes for hardware-free testing
//!
//! # Usage
//! ```rust
//! use eyecap::backend::{default_registry, OpenOutcome, VideoCapture};
//! use eyecap::driver::NullProbe;
//! use eyecap::testing::FakeUsbSdk;
//! use eyecap::EyecapConfig;
//! use std::sync::Arc;
//!
//! let config = EyecapConfig::default();
//! let (usb, _scripts) = FakeUsbSdk::with_devices(1);
//! let registry = default_registry(&config, None, Some(Arc::new(usb)), Arc::new(NullProbe));
//!
//! match registry.open(0) {
//!     OpenOutcome::Adapter(capture) => assert!(capture.is_opened()),
//!     OpenOutcome::NativePassthrough => { /* host capture + PassthroughControls */ }
//!     OpenOutcome::Unavailable => { /* fall back to the host capture path */ }
//! }
//! ```
pub mod backend;
pub mod config;
pub mod conversion;
pub mod driver;
pub mod errors;
pub mod passthrough;
pub mod sdk;
pub mod settings;
pub mod types;

// Testing utilities - synthetic data and SDK fakes for offline testing
pub mod testing;

// Re-exports for convenience
pub use backend::{
    default_registry, install_registry, open_device, BackendRegistry, OpenOutcome, VideoCapture,
};
pub use config::EyecapConfig;
pub use errors::CameraError;
pub use passthrough::PassthroughControls;
pub use types::{CameraFormat, CameraFrame, CaptureProperty, DeviceSelector, Domain, FrameOrigin};

/// Initialize logging for the capture backends
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "eyecap=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
