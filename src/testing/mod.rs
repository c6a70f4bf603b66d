//! Testing utilities for eyecap
//!
//! Provides synthetic frame data and scriptable fakes for the vendor
//! SDK seams, enabling reliable offline testing without camera
//! hardware.

pub mod fake_multicam;
pub mod fake_usb;
pub mod stores;
pub mod synthetic;

pub use fake_multicam::{FakeMulticamDevice, FakeMulticamSdk};
pub use fake_usb::{FakeUsbSdk, UsbScript};
pub use stores::{MemorySettingsStore, StaticProbe};
pub use synthetic::{synthetic_bgra_frame, synthetic_yuv422_frame};
