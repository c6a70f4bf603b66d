//! Trait surface of the USB-driver-level vendor library.

use super::SdkError;
use crate::types::FrameOrigin;

/// Borrowed view of the most recent native frame.
///
/// `pixels` is packed YUV422 with `stride` bytes per row; the stride may
/// exceed `2 * width` when the transfer layer pads rows.
pub struct UsbFrame<'a> {
    pub pixels: &'a [u8],
    pub stride: usize,
    pub origin: FrameOrigin,
}

/// Device enumeration entry point of the USB-driver library.
pub trait UsbEyeSdk: Send + Sync {
    /// Number of connected devices.
    fn device_count(&self) -> u32;

    /// Claim the device at `index`. The returned handle owns the
    /// physical device for its lifetime.
    fn open_device(&self, index: u32) -> Option<Box<dyn UsbEyeDevice>>;
}

/// One claimed USB camera.
///
/// Dropping the handle releases the physical device; the library's own
/// object lifetime governs the USB teardown.
pub trait UsbEyeDevice: Send {
    /// Negotiate the capture mode. Must be called before `start`.
    fn init(&mut self, width: u32, height: u32, fps: u32) -> Result<(), SdkError>;

    fn start(&mut self) -> Result<(), SdkError>;

    fn stop(&mut self);

    /// Service pending USB transfers. Typically returns within a frame
    /// period; there is no cancellation.
    fn update(&mut self);

    /// Whether a frame arrived since the last `update`. Unset is a
    /// normal polling outcome, not an error.
    fn new_frame_ready(&self) -> bool;

    /// The most recent native frame, if any has been delivered yet.
    fn last_frame(&mut self) -> Option<UsbFrame<'_>>;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn frame_rate(&self) -> u32;

    fn set_auto_gain(&mut self, enabled: bool);
    fn auto_gain(&self) -> bool;
    fn set_auto_white_balance(&mut self, enabled: bool);
    fn auto_white_balance(&self) -> bool;

    fn gain(&self) -> u8;
    fn set_gain(&mut self, value: u8);
    fn exposure(&self) -> u8;
    fn set_exposure(&mut self, value: u8);
    fn brightness(&self) -> u8;
    fn set_brightness(&mut self, value: u8);
    fn contrast(&self) -> u8;
    fn set_contrast(&mut self, value: u8);
    fn hue(&self) -> u8;
    fn set_hue(&mut self, value: u8);
    fn sharpness(&self) -> u8;
    fn set_sharpness(&mut self, value: u8);
}
