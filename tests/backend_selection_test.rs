//! Tests for the backend selection policy
//!
//! Covers priority order, preferred-backend index encoding, the
//! defer-to-native rule, and fallback to the host capture path.

use eyecap::backend::{default_registry, BackendRegistry, OpenOutcome};
use eyecap::driver::NullProbe;
use eyecap::testing::{FakeMulticamSdk, FakeUsbSdk, StaticProbe, UsbScript};
use eyecap::types::Domain;
use eyecap::EyecapConfig;
use std::sync::Arc;

fn registry_with(
    multicam_devices: Option<u8>,
    usb_devices: Option<usize>,
    probe: Arc<dyn eyecap::driver::DriverProbe>,
) -> (BackendRegistry, Vec<UsbScript>) {
    let config = EyecapConfig::default();
    let multicam = multicam_devices
        .map(|count| Arc::new(FakeMulticamSdk::with_devices(count)) as Arc<dyn eyecap::sdk::MulticamSdk>);
    let (usb, scripts) = match usb_devices {
        Some(count) => {
            let (sdk, scripts) = FakeUsbSdk::with_devices(count);
            (
                Some(Arc::new(sdk) as Arc<dyn eyecap::sdk::UsbEyeSdk>),
                scripts,
            )
        }
        None => (None, Vec::new()),
    };
    (default_registry(&config, multicam, usb, probe), scripts)
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_autodetect_prefers_multicam() {
        let (registry, _) = registry_with(Some(1), Some(1), Arc::new(NullProbe));
        match registry.open(0) {
            OpenOutcome::Adapter(capture) => assert_eq!(capture.domain(), Domain::MultiCam),
            _ => panic!("expected the multi-camera adapter"),
        }
    }

    #[test]
    fn test_falls_through_to_usb_when_multicam_has_no_device() {
        let (registry, _) = registry_with(Some(0), Some(1), Arc::new(NullProbe));
        match registry.open(0) {
            OpenOutcome::Adapter(capture) => assert_eq!(capture.domain(), Domain::UsbDriver),
            _ => panic!("expected the USB-driver adapter"),
        }
    }

    #[test]
    fn test_preferred_domain_is_honored() {
        let (registry, _) = registry_with(Some(1), Some(1), Arc::new(NullProbe));

        match registry.open(2300) {
            OpenOutcome::Adapter(capture) => assert_eq!(capture.domain(), Domain::UsbDriver),
            _ => panic!("expected the USB-driver adapter"),
        }

        match registry.open(2100) {
            OpenOutcome::Adapter(capture) => assert_eq!(capture.domain(), Domain::MultiCam),
            _ => panic!("expected the multi-camera adapter"),
        }
    }

    #[test]
    fn test_preferred_domain_failure_never_falls_through() {
        // The multi-camera backend could open device 0, but the index
        // pins selection to the (empty) USB backend.
        let (registry, _) = registry_with(Some(1), Some(0), Arc::new(NullProbe));
        assert!(registry.open(2300).is_unavailable());
    }

    #[test]
    fn test_out_of_range_ordinal_everywhere_is_unavailable() {
        let (registry, _) = registry_with(Some(1), Some(1), Arc::new(NullProbe));
        assert!(registry.open(5).is_unavailable());
    }

    #[test]
    fn test_no_sdks_registers_no_backends() {
        let (registry, _) = registry_with(None, None, Arc::new(NullProbe));
        assert!(registry.is_empty());
        assert!(registry.open(0).is_unavailable());
    }

    #[test]
    fn test_registration_order_is_priority_order() {
        let (registry, _) = registry_with(Some(1), Some(1), Arc::new(NullProbe));
        assert_eq!(
            registry.domains(),
            vec![Domain::MultiCam, Domain::NativeDriver, Domain::UsbDriver]
        );
    }
}

#[cfg(test)]
mod native_driver_tests {
    use super::*;

    fn official_probe() -> Arc<StaticProbe> {
        Arc::new(StaticProbe::detected(
            &EyecapConfig::default().device.driver_provider,
        ))
    }

    #[test]
    fn test_installed_vendor_driver_defers_before_usb() {
        // Multi-camera backend has no device; the USB backend does, but
        // the defer verdict must stop selection before it is tried.
        let (registry, scripts) = registry_with(Some(0), Some(1), official_probe());

        assert!(matches!(registry.open(0), OpenOutcome::NativePassthrough));
        assert!(!scripts[0].snapshot().inited);
    }

    #[test]
    fn test_preferred_native_driver_domain() {
        let (registry, _) = registry_with(Some(0), None, official_probe());
        assert!(matches!(registry.open(2200), OpenOutcome::NativePassthrough));

        let (registry, _) = registry_with(Some(0), None, Arc::new(NullProbe));
        assert!(registry.open(2200).is_unavailable());
    }

    #[test]
    fn test_foreign_driver_does_not_defer() {
        let probe = Arc::new(StaticProbe::detected("Generic USB Video"));
        let (registry, _) = registry_with(Some(0), Some(1), probe);

        match registry.open(0) {
            OpenOutcome::Adapter(capture) => assert_eq!(capture.domain(), Domain::UsbDriver),
            _ => panic!("expected fallthrough to the USB-driver adapter"),
        }
    }

    #[test]
    fn test_defer_rule_requires_multicam_package() {
        // The native-driver rule ships with the multi-camera SDK; with
        // only the USB library present it must not register.
        let (registry, _) = registry_with(None, Some(1), official_probe());
        assert_eq!(registry.domains(), vec![Domain::UsbDriver]);
    }
}
