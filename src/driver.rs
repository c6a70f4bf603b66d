//! Native-driver detection.
//!
//! When the vendor's own OS driver is installed for the camera, the
//! vendor SDK backends must stand down and let the host pipeline's
//! built-in capture path own the device. Detection compares the
//! provider name the installed driver registered against the provider
//! name configured for the vendor's official package.

use crate::config::DeviceConfig;

/// OS driver lookup seam.
///
/// The real implementation reads the driver-registered provider-name
/// string for a vendor/product USB id from the operating system; the
/// embedding application injects it. [`NullProbe`] answers "absent"
/// everywhere, which is the correct behavior on hosts without such a
/// lookup.
pub trait DriverProbe: Send + Sync {
    /// Provider name of the currently installed driver for the given
    /// USB id, or `None` when no driver entry exists.
    fn provider_name(&self, vendor_id: u16, product_id: u16) -> Option<String>;
}

/// Probe for systems with no driver registry to consult.
pub struct NullProbe;

impl DriverProbe for NullProbe {
    fn provider_name(&self, _vendor_id: u16, _product_id: u16) -> Option<String> {
        None
    }
}

/// Whether the vendor's official driver package owns the device.
///
/// A missing driver entry and a mismatched provider name both answer
/// false; neither is an error.
pub fn vendor_driver_installed(probe: &dyn DriverProbe, device: &DeviceConfig) -> bool {
    match probe.provider_name(device.vendor_id, device.product_id) {
        Some(name) => name == device.driver_provider,
        None => false,
    }
}
