//! Backend selection and the capture capability surface.
//!
//! Backends register factories in a [`BackendRegistry`]; opening a
//! device walks the registered entries in priority order and returns
//! the first adapter that opens, a defer-to-native verdict, or
//! "unavailable" so the caller can fall through to the host pipeline's
//! own capture path.

pub mod multicam;
pub mod usb;

pub use multicam::MultiCamCapture;
pub use usb::UsbEyeCapture;

use crate::config::EyecapConfig;
use crate::driver::{vendor_driver_installed, DriverProbe};
use crate::sdk::{MulticamSdk, UsbEyeSdk};
use crate::types::{CameraFrame, CaptureProperty, DeviceSelector, Domain};
use std::sync::{Arc, Mutex};

/// The capture capability set every backend adapter satisfies.
///
/// Methods keep the sentinel contract of the host pipeline's capture
/// interface: grab/retrieve/set report success as `bool` and property
/// reads answer 0.0 for unsupported controls. A false grab is a normal
/// no-new-data outcome, not an error.
///
/// Adapters are single-threaded and blocking: drive one from the thread
/// that owns it, and do not pipeline a grab concurrently with a
/// property set (exposure/gain writes may reset the vendor streaming
/// context).
pub trait VideoCapture: Send {
    /// Whether the adapter currently owns an open device.
    fn is_opened(&self) -> bool;

    /// Advance to the next frame. False means no new frame is ready.
    fn grab_frame(&mut self) -> bool;

    /// Deliver the current frame as BGR into `out`, flipped to
    /// top-left origin. False when no frame is available. `channel` is
    /// part of the host interface; both backends deliver a single
    /// stream and ignore it.
    fn retrieve_frame(&mut self, channel: u32, out: &mut CameraFrame) -> bool;

    /// Read a property in its normalized range; 0.0 when unsupported.
    fn property(&self, property: CaptureProperty) -> f64;

    /// Write a property from its normalized range. False for
    /// unsupported or read-only properties; prior state is unchanged.
    fn set_property(&mut self, property: CaptureProperty, value: f64) -> bool;

    /// Which vendor SDK produced this adapter. Diagnostics only.
    fn domain(&self) -> Domain;
}

/// One backend factory's verdict for a requested device ordinal.
pub enum OpenAttempt {
    /// The backend opened the device.
    Opened(Box<dyn VideoCapture>),
    /// The backend recognizes the device but capture belongs to the
    /// host's native path; selection stops immediately.
    Defer,
    /// The backend could not open the device; selection continues.
    Failed,
}

/// Selector verdict for a requested device index.
pub enum OpenOutcome {
    /// An adapter opened the device.
    Adapter(Box<dyn VideoCapture>),
    /// The vendor's own OS driver owns the device; use the host
    /// pipeline's built-in capture path (and
    /// [`PassthroughControls`](crate::passthrough::PassthroughControls)
    /// for exposure/gain).
    NativePassthrough,
    /// No backend could open the device.
    Unavailable,
}

impl OpenOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, OpenOutcome::Unavailable)
    }
}

/// Factory producing an adapter for a device ordinal within one backend.
pub type BackendFactory = Box<dyn Fn(u32) -> OpenAttempt + Send + Sync>;

/// Runtime-registered adapter factory table, walked in registration
/// order. A vendor SDK that is not present simply registers nothing.
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<(Domain, BackendFactory)>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Append a backend at the end of the priority order.
    pub fn register(&mut self, domain: Domain, factory: BackendFactory) {
        log::debug!("Registered {:?} capture backend", domain);
        self.backends.push((domain, factory));
    }

    /// Registered domains in priority order.
    pub fn domains(&self) -> Vec<Domain> {
        self.backends.iter().map(|(domain, _)| *domain).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Try to open the device encoded by `index`.
    ///
    /// A non-zero hundreds prefix restricts the attempt to that single
    /// backend; the selection never falls through to another domain,
    /// even when the preferred one fails or is not registered.
    pub fn open(&self, index: i32) -> OpenOutcome {
        let selector = match DeviceSelector::from_index(index) {
            Some(selector) => selector,
            None => return OpenOutcome::Unavailable,
        };

        for (domain, factory) in &self.backends {
            if !selector.matches(*domain) {
                continue;
            }
            log::debug!(
                "Trying {:?} backend for device ordinal {}",
                domain,
                selector.ordinal
            );
            match factory(selector.ordinal) {
                OpenAttempt::Opened(capture) => return OpenOutcome::Adapter(capture),
                OpenAttempt::Defer => {
                    log::info!("Vendor driver detected; deferring to the host capture path");
                    return OpenOutcome::NativePassthrough;
                }
                OpenAttempt::Failed => {}
            }
        }

        OpenOutcome::Unavailable
    }
}

/// Build the standard registry: multi-camera SDK first, then the
/// native-driver rule, then the USB-driver SDK.
///
/// The native-driver entry ships with the multi-camera SDK (the two
/// come from the same vendor package) and therefore registers only
/// when that SDK handle is supplied.
pub fn default_registry(
    config: &EyecapConfig,
    multicam: Option<Arc<dyn MulticamSdk>>,
    usb: Option<Arc<dyn UsbEyeSdk>>,
    probe: Arc<dyn DriverProbe>,
) -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    let format = config.format();

    if let Some(sdk) = multicam {
        let timeout_ms = config.capture.retrieve_timeout_ms;
        registry.register(
            Domain::MultiCam,
            Box::new(move |ordinal| {
                match MultiCamCapture::open(sdk.clone(), ordinal, format, timeout_ms) {
                    Ok(capture) => OpenAttempt::Opened(Box::new(capture)),
                    Err(e) => {
                        log::warn!("Multi-camera backend failed on device {}: {}", ordinal, e);
                        OpenAttempt::Failed
                    }
                }
            }),
        );

        let device = config.device.clone();
        registry.register(
            Domain::NativeDriver,
            Box::new(move |_ordinal| {
                if vendor_driver_installed(probe.as_ref(), &device) {
                    OpenAttempt::Defer
                } else {
                    OpenAttempt::Failed
                }
            }),
        );
    }

    if let Some(sdk) = usb {
        registry.register(
            Domain::UsbDriver,
            Box::new(move |ordinal| {
                match UsbEyeCapture::open(sdk.as_ref(), ordinal, format) {
                    Ok(capture) => OpenAttempt::Opened(Box::new(capture)),
                    Err(e) => {
                        log::warn!("USB-driver backend failed on device {}: {}", ordinal, e);
                        OpenAttempt::Failed
                    }
                }
            }),
        );
    }

    registry
}

// Process-global registry for embedders that wire backends once at
// startup and open devices from call sites without plumbing.
lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: Mutex<BackendRegistry> = Mutex::new(BackendRegistry::new());
}

/// Replace the process-global registry.
pub fn install_registry(registry: BackendRegistry) {
    match GLOBAL_REGISTRY.lock() {
        Ok(mut global) => *global = registry,
        Err(poisoned) => *poisoned.into_inner() = registry,
    }
}

/// Open a device through the process-global registry.
pub fn open_device(index: i32) -> OpenOutcome {
    match GLOBAL_REGISTRY.lock() {
        Ok(global) => global.open(index),
        Err(_) => {
            log::error!("Global backend registry is poisoned");
            OpenOutcome::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCapture(Domain);

    impl VideoCapture for StubCapture {
        fn is_opened(&self) -> bool {
            true
        }
        fn grab_frame(&mut self) -> bool {
            true
        }
        fn retrieve_frame(&mut self, _channel: u32, _out: &mut CameraFrame) -> bool {
            false
        }
        fn property(&self, _property: CaptureProperty) -> f64 {
            0.0
        }
        fn set_property(&mut self, _property: CaptureProperty, _value: f64) -> bool {
            false
        }
        fn domain(&self) -> Domain {
            self.0
        }
    }

    fn opens(domain: Domain) -> BackendFactory {
        Box::new(move |_| OpenAttempt::Opened(Box::new(StubCapture(domain))))
    }

    fn fails() -> BackendFactory {
        Box::new(|_| OpenAttempt::Failed)
    }

    #[test]
    fn test_empty_registry_is_unavailable() {
        let registry = BackendRegistry::new();
        assert!(registry.open(0).is_unavailable());
    }

    #[test]
    fn test_first_successful_backend_wins() {
        let mut registry = BackendRegistry::new();
        registry.register(Domain::MultiCam, fails());
        registry.register(Domain::UsbDriver, opens(Domain::UsbDriver));

        match registry.open(0) {
            OpenOutcome::Adapter(capture) => assert_eq!(capture.domain(), Domain::UsbDriver),
            _ => panic!("expected an adapter"),
        }
    }

    #[test]
    fn test_preferred_domain_never_falls_through() {
        let mut registry = BackendRegistry::new();
        registry.register(Domain::MultiCam, opens(Domain::MultiCam));
        registry.register(Domain::UsbDriver, fails());

        // 2300 pins selection to the USB backend; its failure must not
        // fall back to the multi-camera backend.
        assert!(registry.open(2300).is_unavailable());
    }

    #[test]
    fn test_unknown_preferred_tag_is_unavailable() {
        let mut registry = BackendRegistry::new();
        registry.register(Domain::MultiCam, opens(Domain::MultiCam));
        assert!(registry.open(2500).is_unavailable());
    }

    #[test]
    fn test_defer_stops_selection() {
        let mut registry = BackendRegistry::new();
        registry.register(Domain::NativeDriver, Box::new(|_| OpenAttempt::Defer));
        registry.register(Domain::UsbDriver, opens(Domain::UsbDriver));

        assert!(matches!(
            registry.open(0),
            OpenOutcome::NativePassthrough
        ));
    }

    #[test]
    fn test_negative_index_is_unavailable() {
        let mut registry = BackendRegistry::new();
        registry.register(Domain::UsbDriver, opens(Domain::UsbDriver));
        assert!(registry.open(-1).is_unavailable());
    }
}
