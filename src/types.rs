//! Core types shared by the capture backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Backend domain tag identifying which vendor SDK produced an adapter.
///
/// The numeric values double as the preferred-backend prefix in the
/// device index encoding (see [`DeviceSelector`]). They identify the
/// producing backend for diagnostics and capability queries only; no
/// behavior branches on them after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Domain {
    /// Multi-camera DLL backend.
    MultiCam = 2100,
    /// Vendor's own OS driver; capture is deferred to the host pipeline.
    NativeDriver = 2200,
    /// USB-driver-level library backend.
    UsbDriver = 2300,
}

impl Domain {
    /// Numeric tag used in the device index encoding.
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Reverse lookup from a numeric tag.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            2100 => Some(Domain::MultiCam),
            2200 => Some(Domain::NativeDriver),
            2300 => Some(Domain::UsbDriver),
            _ => None,
        }
    }
}

/// Decoded device index.
///
/// The hundreds of a requested index select a preferred backend domain
/// (`0` = autodetect across all registered backends); the remainder is
/// the device ordinal within that backend. `2300` therefore means
/// "device 0 via the USB-driver backend only".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSelector {
    /// Preferred domain tag, `0` for autodetect.
    pub preferred_tag: i32,
    /// Device ordinal within the selected backend.
    pub ordinal: u32,
}

impl DeviceSelector {
    /// Decode a requested device index. Negative indices are invalid.
    pub fn from_index(index: i32) -> Option<Self> {
        if index < 0 {
            return None;
        }
        Some(Self {
            preferred_tag: (index / 100) * 100,
            ordinal: (index % 100) as u32,
        })
    }

    /// Whether the selection is pinned to a single backend.
    pub fn is_restricted(&self) -> bool {
        self.preferred_tag != 0
    }

    /// Whether `domain` should be attempted under this selection.
    pub fn matches(&self, domain: Domain) -> bool {
        self.preferred_tag == 0 || self.preferred_tag == domain.tag()
    }
}

/// Numeric camera controls exposed by every backend.
///
/// Each property has a vendor-specific native range and a normalized
/// external range; the adapters map between them with fixed linear
/// transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureProperty {
    Brightness,
    Contrast,
    Exposure,
    FrameHeight,
    FrameWidth,
    FrameRate,
    Gain,
    Hue,
    Sharpness,
}

impl CaptureProperty {
    /// All properties, in a stable order.
    pub fn all() -> [CaptureProperty; 9] {
        [
            CaptureProperty::Brightness,
            CaptureProperty::Contrast,
            CaptureProperty::Exposure,
            CaptureProperty::FrameHeight,
            CaptureProperty::FrameWidth,
            CaptureProperty::FrameRate,
            CaptureProperty::Gain,
            CaptureProperty::Hue,
            CaptureProperty::Sharpness,
        ]
    }
}

impl FromStr for CaptureProperty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brightness" => Ok(Self::Brightness),
            "contrast" => Ok(Self::Contrast),
            "exposure" => Ok(Self::Exposure),
            "frame_height" => Ok(Self::FrameHeight),
            "frame_width" => Ok(Self::FrameWidth),
            "frame_rate" => Ok(Self::FrameRate),
            "gain" => Ok(Self::Gain),
            "hue" => Ok(Self::Hue),
            "sharpness" => Ok(Self::Sharpness),
            _ => Err(()),
        }
    }
}

/// Negotiated capture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl CameraFormat {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self { width, height, fps }
    }

    /// The VGA mode both vendor SDKs negotiate for the PS3 Eye.
    pub fn vga() -> Self {
        Self::new(640, 480, 75)
    }
}

impl Default for CameraFormat {
    fn default() -> Self {
        Self::vga()
    }
}

/// Row order of a source frame as reported by a vendor SDK.
///
/// `BottomUp` frames are vertically flipped before delivery so callers
/// always receive top-left-origin images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOrigin {
    TopLeft,
    BottomUp,
}

/// A delivered BGR frame with capture metadata.
///
/// The pixel buffer holds exactly `width * height * 3` bytes in BGR
/// order. Adapters overwrite the buffer in place on each retrieve; the
/// id and timestamp are refreshed per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFrame {
    pub id: Uuid,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub device_id: String,
    pub format: String,
    pub timestamp: DateTime<Utc>,
}

impl CameraFrame {
    /// Create a frame from a filled BGR buffer.
    pub fn new(data: Vec<u8>, width: u32, height: u32, device_id: String) -> Self {
        let size_bytes = data.len();
        Self {
            id: Uuid::new_v4(),
            data,
            width,
            height,
            size_bytes,
            device_id,
            format: "BGR8".to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Create an empty frame ready to be filled by a retrieve call.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, String::new())
    }

    /// Set the format label.
    pub fn with_format(mut self, format: String) -> Self {
        self.format = format;
        self
    }

    /// Re-size the buffer for a new capture and refresh the metadata.
    ///
    /// Returns the buffer as a mutable slice of `width * height * 3`
    /// bytes for the adapter to fill.
    pub fn reset(&mut self, width: u32, height: u32, device_id: &str) -> &mut [u8] {
        let len = (width as usize) * (height as usize) * 3;
        self.data.resize(len, 0);
        self.width = width;
        self.height = height;
        self.size_bytes = len;
        if self.device_id != device_id {
            self.device_id = device_id.to_string();
        }
        self.id = Uuid::new_v4();
        self.timestamp = Utc::now();
        &mut self.data
    }

    /// Convert the BGR buffer into an RGB image for inspection or
    /// saving. Returns `None` if the buffer size does not match the
    /// stated dimensions.
    pub fn to_image(&self) -> Option<image::RgbImage> {
        let expected = (self.width as usize) * (self.height as usize) * 3;
        if self.data.len() != expected {
            return None;
        }
        let mut rgb = Vec::with_capacity(expected);
        for px in self.data.chunks_exact(3) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        image::RgbImage::from_raw(self.width, self.height, rgb)
    }
}
