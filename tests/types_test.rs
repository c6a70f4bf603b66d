//! Tests for eyecap core types
//!
//! Ensures correct behavior of the device index encoding, domain tags,
//! and frame metadata, including serde round trips.

use eyecap::types::{CameraFormat, CameraFrame, CaptureProperty, DeviceSelector, Domain};

#[cfg(test)]
mod domain_tests {
    use super::*;

    #[test]
    fn test_domain_tags_match_index_encoding() {
        assert_eq!(Domain::MultiCam.tag(), 2100);
        assert_eq!(Domain::NativeDriver.tag(), 2200);
        assert_eq!(Domain::UsbDriver.tag(), 2300);
    }

    #[test]
    fn test_domain_serialization() {
        let domain = Domain::UsbDriver;
        let json = serde_json::to_string(&domain).unwrap();
        assert!(json.contains("UsbDriver"));

        let deserialized: Domain = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, domain);
    }
}

#[cfg(test)]
mod selector_tests {
    use super::*;

    #[test]
    fn test_autodetect_indices() {
        for index in [0, 1, 99] {
            let selector = DeviceSelector::from_index(index).unwrap();
            assert_eq!(selector.preferred_tag, 0);
            assert_eq!(selector.ordinal, index as u32);
            assert!(selector.matches(Domain::MultiCam));
            assert!(selector.matches(Domain::UsbDriver));
        }
    }

    #[test]
    fn test_preferred_indices_split_into_tag_and_ordinal() {
        let selector = DeviceSelector::from_index(2103).unwrap();
        assert_eq!(selector.preferred_tag, 2100);
        assert_eq!(selector.ordinal, 3);
        assert!(selector.matches(Domain::MultiCam));
        assert!(!selector.matches(Domain::NativeDriver));
    }

    #[test]
    fn test_negative_indices_are_invalid() {
        assert_eq!(DeviceSelector::from_index(-1), None);
        assert_eq!(DeviceSelector::from_index(-2300), None);
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn test_vga_is_the_default_mode() {
        let format = CameraFormat::default();
        assert_eq!((format.width, format.height, format.fps), (640, 480, 75));
        assert_eq!(format, CameraFormat::vga());
    }

    #[test]
    fn test_format_serialization() {
        let format = CameraFormat::new(320, 240, 60);
        let json = serde_json::to_string(&format).unwrap();
        let deserialized: CameraFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, format);
    }
}

#[cfg(test)]
mod frame_tests {
    use super::*;

    #[test]
    fn test_frame_metadata_refreshes_on_reset() {
        let mut frame = CameraFrame::empty();
        frame.reset(4, 2, "multicam:0");
        let first_id = frame.id;
        let first_timestamp = frame.timestamp;

        frame.reset(4, 2, "multicam:0");
        assert_ne!(frame.id, first_id);
        assert!(frame.timestamp >= first_timestamp);
        assert_eq!(frame.size_bytes, 4 * 2 * 3);
    }

    #[test]
    fn test_frame_serialization_round_trip() {
        let mut frame = CameraFrame::empty();
        frame.reset(2, 2, "usbeye:1");
        let json = serde_json::to_string(&frame).unwrap();
        let deserialized: CameraFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, frame.id);
        assert_eq!(deserialized.data, frame.data);
        assert_eq!(deserialized.device_id, "usbeye:1");
    }

    #[test]
    fn test_property_names_parse() {
        for property in CaptureProperty::all() {
            let name = match property {
                CaptureProperty::Brightness => "brightness",
                CaptureProperty::Contrast => "contrast",
                CaptureProperty::Exposure => "exposure",
                CaptureProperty::FrameHeight => "frame_height",
                CaptureProperty::FrameWidth => "frame_width",
                CaptureProperty::FrameRate => "frame_rate",
                CaptureProperty::Gain => "gain",
                CaptureProperty::Hue => "hue",
                CaptureProperty::Sharpness => "sharpness",
            };
            assert_eq!(name.parse::<CaptureProperty>(), Ok(property));
        }
    }
}
