//! Fuzz-style tests using proptest
//!
//! These provide fuzz-like coverage of the conversion routine and the
//! property transforms without requiring nightly Rust or cargo-fuzz.
//! Run with: cargo test --test fuzz_tests

use proptest::prelude::*;

/// Deterministic pseudo-random buffer fill (xorshift).
fn fill_from_seed(buf: &mut [u8], mut seed: u64) {
    for byte in buf.iter_mut() {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        *byte = (seed & 0xff) as u8;
    }
}

mod conversion_fuzz {
    use super::*;
    use eyecap::conversion::yuv422_to_bgr;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// The converter never panics and always produces exactly
        /// width * height * 3 bytes, regardless of input content.
        #[test]
        fn fuzz_conversion_output_shape(
            pairs in 1usize..16,
            height in 1usize..16,
            padding in 0usize..8,
            seed in any::<u64>(),
        ) {
            let width = pairs * 2;
            let stride = width * 2 + padding;
            let mut src = vec![0u8; stride * height];
            fill_from_seed(&mut src, seed);

            let mut dst = vec![0u8; width * height * 3];
            yuv422_to_bgr(&src, stride, &mut dst, width, height);

            let mut again = vec![0u8; width * height * 3];
            yuv422_to_bgr(&src, stride, &mut again, width, height);
            prop_assert_eq!(dst, again);
        }

        /// Bytes in the row padding never influence the output.
        #[test]
        fn fuzz_padding_bytes_are_inert(
            pairs in 1usize..12,
            height in 1usize..12,
            padding in 1usize..8,
            seed in any::<u64>(),
            pad_seed in any::<u64>(),
        ) {
            let width = pairs * 2;
            let stride = width * 2 + padding;
            let mut src_a = vec![0u8; stride * height];
            fill_from_seed(&mut src_a, seed);

            // Same packed pixels, different padding bytes.
            let mut src_b = src_a.clone();
            let mut pad = vec![0u8; padding];
            fill_from_seed(&mut pad, pad_seed);
            for row in 0..height {
                src_b[row * stride + width * 2..(row + 1) * stride]
                    .copy_from_slice(&pad);
            }

            let mut dst_a = vec![0u8; width * height * 3];
            let mut dst_b = vec![0u8; width * height * 3];
            yuv422_to_bgr(&src_a, stride, &mut dst_a, width, height);
            yuv422_to_bgr(&src_b, stride, &mut dst_b, width, height);
            prop_assert_eq!(dst_a, dst_b);
        }
    }
}

mod multicam_property_fuzz {
    use super::*;
    use eyecap::backend::{MultiCamCapture, VideoCapture};
    use eyecap::testing::FakeMulticamSdk;
    use eyecap::types::{CameraFormat, CaptureProperty};
    use std::sync::Arc;

    fn open() -> MultiCamCapture {
        let sdk = Arc::new(FakeMulticamSdk::with_devices(1));
        MultiCamCapture::open(sdk, 0, CameraFormat::vga(), 2000).expect("fake device opens")
    }

    proptest! {
        /// Exposure survives a set/get round trip within one unit of
        /// the native [0, 511] resolution.
        #[test]
        fn fuzz_exposure_round_trip(native in 1i32..=511) {
            let mut capture = open();
            let normalized = native as f64 / 2.0;
            prop_assert!(capture.set_property(CaptureProperty::Exposure, normalized));
            let read_back = capture.property(CaptureProperty::Exposure) * 2.0;
            prop_assert!((read_back - native as f64).abs() <= 1.0);
        }

        /// Gain survives a set/get round trip within one unit of the
        /// native [0, 79] resolution.
        #[test]
        fn fuzz_gain_round_trip(native in 1i32..=79) {
            let mut capture = open();
            let normalized = native as f64 * 256.0 / 80.0;
            prop_assert!(capture.set_property(CaptureProperty::Gain, normalized));
            let read_back = capture.property(CaptureProperty::Gain) * 80.0 / 256.0;
            prop_assert!((read_back - native as f64).abs() <= 1.0);
        }

        /// Brightness is native-range passthrough.
        #[test]
        fn fuzz_brightness_round_trip(native in -500i32..=500) {
            let mut capture = open();
            prop_assert!(capture.set_property(CaptureProperty::Brightness, native as f64));
            prop_assert_eq!(capture.property(CaptureProperty::Brightness), native as f64);
        }
    }
}

mod usb_property_fuzz {
    use super::*;
    use eyecap::backend::{UsbEyeCapture, VideoCapture};
    use eyecap::testing::FakeUsbSdk;
    use eyecap::types::{CameraFormat, CaptureProperty};

    fn open() -> UsbEyeCapture {
        let (sdk, _scripts) = FakeUsbSdk::with_devices(1);
        UsbEyeCapture::open(&sdk, 0, CameraFormat::vga()).expect("fake device opens")
    }

    proptest! {
        /// Gain and sharpness survive a round trip within one unit of
        /// the native [0, 63] resolution.
        #[test]
        fn fuzz_scaled_round_trips(native in 0u8..=63) {
            let mut capture = open();
            for property in [CaptureProperty::Gain, CaptureProperty::Sharpness] {
                let normalized = native as f64 * 256.0 / 64.0;
                prop_assert!(capture.set_property(property, normalized));
                let read_back = capture.property(property) * 64.0 / 256.0;
                prop_assert!((read_back - native as f64).abs() <= 1.0);
            }
        }

        /// The 1:1 properties read back exactly.
        #[test]
        fn fuzz_linear_round_trips(value in 0u8..=255) {
            let mut capture = open();
            for property in [
                CaptureProperty::Brightness,
                CaptureProperty::Contrast,
                CaptureProperty::Exposure,
                CaptureProperty::Hue,
            ] {
                prop_assert!(capture.set_property(property, value as f64));
                prop_assert_eq!(capture.property(property), value as f64);
            }
        }
    }
}
