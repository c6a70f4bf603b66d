//! Adapter over the USB-driver-level vendor library.

use crate::backend::VideoCapture;
use crate::conversion;
use crate::errors::CameraError;
use crate::sdk::{UsbEyeDevice, UsbEyeSdk};
use crate::types::{CameraFormat, CameraFrame, CaptureProperty, Domain, FrameOrigin};

/// Capture through the USB-driver library.
///
/// The library delivers packed YUV422 frames; grab polls the transfer
/// layer and reports the new-frame flag, retrieve converts the native
/// frame straight into the caller's buffer with the BT.601 routine.
pub struct UsbEyeCapture {
    device: Option<Box<dyn UsbEyeDevice>>,
    device_id: String,
    width: u32,
    height: u32,
}

impl UsbEyeCapture {
    /// Open the device at `index` and start streaming.
    ///
    /// Initializes the device at the configured mode and disables
    /// auto-gain and auto-white-balance.
    pub fn open(
        sdk: &dyn UsbEyeSdk,
        index: u32,
        format: CameraFormat,
    ) -> Result<Self, CameraError> {
        let count = sdk.device_count();
        log::info!("USB-driver SDK reports {} devices", count);

        if index >= count {
            return Err(CameraError::DeviceUnavailable(format!(
                "index {} out of range ({} devices)",
                index, count
            )));
        }

        let mut device = sdk.open_device(index).ok_or_else(|| {
            CameraError::DeviceUnavailable(format!("device {} could not be claimed", index))
        })?;

        device
            .init(format.width, format.height, format.fps)
            .map_err(|e| {
                CameraError::DeviceUnavailable(format!("init failed for device {}: {}", index, e))
            })?;

        device.start().map_err(|e| {
            CameraError::DeviceUnavailable(format!("start failed for device {}: {}", index, e))
        })?;

        device.set_auto_gain(false);
        device.set_auto_white_balance(false);

        let (width, height) = (device.width(), device.height());
        log::info!(
            "Opened USB-driver device {} at {}x{} @ {} fps",
            index,
            width,
            height,
            device.frame_rate()
        );

        Ok(Self {
            device: Some(device),
            device_id: format!("usbeye:{}", index),
            width,
            height,
        })
    }

    /// Stop streaming and release the device handle.
    ///
    /// The library's own object lifetime releases the physical device.
    pub fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.stop();
            log::debug!("Closed {}", self.device_id);
        }
    }
}

impl VideoCapture for UsbEyeCapture {
    fn is_opened(&self) -> bool {
        self.device.is_some()
    }

    fn grab_frame(&mut self) -> bool {
        let device = match self.device.as_mut() {
            Some(device) => device,
            None => return false,
        };

        // Service pending transfers, then report whether a fresh frame
        // landed. An unset flag is a normal polling outcome.
        device.update();
        device.new_frame_ready()
    }

    fn retrieve_frame(&mut self, _channel: u32, out: &mut CameraFrame) -> bool {
        let (width, height) = (self.width, self.height);
        let device = match self.device.as_mut() {
            Some(device) => device,
            None => return false,
        };

        let frame = match device.last_frame() {
            Some(frame) => frame,
            None => return false,
        };

        let dst = out.reset(width, height, &self.device_id);
        conversion::yuv422_to_bgr(
            frame.pixels,
            frame.stride,
            dst,
            width as usize,
            height as usize,
        );
        if frame.origin == FrameOrigin::BottomUp {
            conversion::flip_vertical(dst, width as usize, height as usize);
        }
        true
    }

    fn property(&self, property: CaptureProperty) -> f64 {
        let device = match self.device.as_ref() {
            Some(device) => device,
            None => return 0.0,
        };

        match property {
            CaptureProperty::Brightness => device.brightness() as f64,
            CaptureProperty::Contrast => device.contrast() as f64,
            CaptureProperty::Exposure => device.exposure() as f64,
            CaptureProperty::FrameRate => device.frame_rate() as f64,
            CaptureProperty::FrameHeight => device.height() as f64,
            CaptureProperty::FrameWidth => device.width() as f64,
            // [0, 63] -> [0, 255]
            CaptureProperty::Gain => device.gain() as f64 * 256.0 / 64.0,
            CaptureProperty::Hue => device.hue() as f64,
            // [0, 63] -> [0, 255]
            CaptureProperty::Sharpness => device.sharpness() as f64 * 256.0 / 64.0,
        }
    }

    fn set_property(&mut self, property: CaptureProperty, value: f64) -> bool {
        let device = match self.device.as_mut() {
            Some(device) => device,
            None => return false,
        };

        match property {
            CaptureProperty::Brightness => {
                device.set_brightness(value.round() as u8);
                true
            }
            CaptureProperty::Contrast => {
                device.set_contrast(value.round() as u8);
                true
            }
            CaptureProperty::Exposure => {
                device.set_exposure(value.round() as u8);
                true
            }
            // Changing the frame mode requires reopening the device.
            CaptureProperty::FrameRate
            | CaptureProperty::FrameHeight
            | CaptureProperty::FrameWidth => false,
            CaptureProperty::Gain => {
                // [0, 255] -> [0, 63]
                device.set_gain((value * 64.0 / 256.0) as u8);
                true
            }
            CaptureProperty::Hue => {
                device.set_hue(value.round() as u8);
                true
            }
            CaptureProperty::Sharpness => {
                // [0, 255] -> [0, 63]
                device.set_sharpness((value * 64.0 / 256.0) as u8);
                true
            }
        }
    }

    fn domain(&self) -> Domain {
        Domain::UsbDriver
    }
}

impl Drop for UsbEyeCapture {
    fn drop(&mut self) {
        self.close();
    }
}
