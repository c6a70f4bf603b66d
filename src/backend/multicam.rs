//! Adapter over the multi-camera vendor DLL.

use crate::backend::VideoCapture;
use crate::conversion;
use crate::errors::CameraError;
use crate::sdk::{CameraHandle, CameraParam, ColorMode, MulticamSdk, Resolution};
use crate::types::{CameraFormat, CameraFrame, CaptureProperty, Domain, FrameOrigin};
use std::sync::Arc;

/// Capture through the multi-camera DLL.
///
/// The DLL delivers processed 4-channel color frames; retrieve blocks
/// inside the SDK up to the configured timeout, remaps to BGR, and
/// flips bottom-up frames. Exposure and gain expose the SDK's auto
/// modes: writing 0 enables the auto mode, any positive value disables
/// it and applies the scaled manual value.
pub struct MultiCamCapture {
    sdk: Arc<dyn MulticamSdk>,
    camera: Option<CameraHandle>,
    device_id: String,
    width: u32,
    height: u32,
    frame_rate: u32,
    retrieve_timeout_ms: u32,
    /// 4-channel staging buffer the SDK fills on retrieve.
    staging: Vec<u8>,
}

impl MultiCamCapture {
    /// Open the device at `index` and start streaming.
    ///
    /// Creates the camera context at processed-color VGA, disables
    /// auto-exposure and auto-gain, and sizes the staging buffer to the
    /// negotiated dimensions.
    pub fn open(
        sdk: Arc<dyn MulticamSdk>,
        index: u32,
        format: CameraFormat,
        retrieve_timeout_ms: u32,
    ) -> Result<Self, CameraError> {
        let count = sdk.camera_count();
        log::info!("Multi-camera SDK reports {} devices", count);

        if index >= count {
            return Err(CameraError::DeviceUnavailable(format!(
                "index {} out of range ({} devices)",
                index, count
            )));
        }

        let uuid = sdk.camera_uuid(index).ok_or_else(|| {
            CameraError::DeviceUnavailable(format!("no identity for device {}", index))
        })?;

        let camera = sdk
            .create_camera(uuid, ColorMode::ColorProcessed, Resolution::Vga, format.fps)
            .map_err(|e| {
                CameraError::DeviceUnavailable(format!("create failed for device {}: {}", index, e))
            })?;

        let (width, height) = sdk.frame_dimensions(camera);

        if let Err(e) = sdk.start_camera(camera) {
            sdk.destroy_camera(camera);
            return Err(CameraError::DeviceUnavailable(format!(
                "start failed for device {}: {}",
                index, e
            )));
        }

        // Manual control from the start; callers re-enable the auto
        // modes by writing 0 to exposure/gain.
        sdk.set_parameter(camera, CameraParam::AutoExposure, 0);
        sdk.set_parameter(camera, CameraParam::AutoGain, 0);

        log::info!(
            "Opened multi-camera device {} at {}x{} @ {} fps",
            index,
            width,
            height,
            format.fps
        );

        Ok(Self {
            sdk,
            camera: Some(camera),
            device_id: format!("multicam:{}", index),
            width,
            height,
            frame_rate: format.fps,
            retrieve_timeout_ms,
            staging: vec![0u8; (width as usize) * (height as usize) * 4],
        })
    }

    /// Stop streaming, destroy the camera context, and release buffers.
    pub fn close(&mut self) {
        if let Some(camera) = self.camera.take() {
            self.sdk.stop_camera(camera);
            self.sdk.destroy_camera(camera);
            log::debug!("Closed {}", self.device_id);
        }
        self.staging = Vec::new();
    }
}

impl VideoCapture for MultiCamCapture {
    fn is_opened(&self) -> bool {
        self.camera.is_some()
    }

    fn grab_frame(&mut self) -> bool {
        // Frame transfer happens in retrieve; grab only confirms the
        // device is streaming.
        self.is_opened()
    }

    fn retrieve_frame(&mut self, _channel: u32, out: &mut CameraFrame) -> bool {
        let camera = match self.camera {
            Some(camera) => camera,
            None => return false,
        };

        let origin = match self
            .sdk
            .get_frame(camera, &mut self.staging, self.retrieve_timeout_ms)
        {
            Ok(origin) => origin,
            Err(e) => {
                log::warn!("Frame retrieve failed on {}: {}", self.device_id, e);
                return false;
            }
        };

        let dst = out.reset(self.width, self.height, &self.device_id);
        conversion::bgra_to_bgr(&self.staging, dst);
        if origin == FrameOrigin::BottomUp {
            conversion::flip_vertical(dst, self.width as usize, self.height as usize);
        }
        true
    }

    fn property(&self, property: CaptureProperty) -> f64 {
        let camera = match self.camera {
            Some(camera) => camera,
            None => return 0.0,
        };

        match property {
            // Lens brightness is already in the normalized [-500, 500].
            CaptureProperty::Brightness => {
                self.sdk.parameter(camera, CameraParam::LensBrightness) as f64
            }
            CaptureProperty::Contrast => 0.0,
            // [0, 511] -> [0, 255]
            CaptureProperty::Exposure => {
                self.sdk.parameter(camera, CameraParam::Exposure) as f64 / 2.0
            }
            CaptureProperty::FrameRate => self.frame_rate as f64,
            CaptureProperty::FrameHeight => self.height as f64,
            CaptureProperty::FrameWidth => self.width as f64,
            // [0, 79] -> [0, 255]
            CaptureProperty::Gain => {
                self.sdk.parameter(camera, CameraParam::Gain) as f64 * (256.0 / 80.0)
            }
            CaptureProperty::Hue => 0.0,
            CaptureProperty::Sharpness => 0.0,
        }
    }

    fn set_property(&mut self, property: CaptureProperty, value: f64) -> bool {
        let camera = match self.camera {
            Some(camera) => camera,
            None => return false,
        };

        match property {
            CaptureProperty::Brightness => {
                self.sdk
                    .set_parameter(camera, CameraParam::LensBrightness, value as i32)
            }
            CaptureProperty::Contrast => false,
            CaptureProperty::Exposure => {
                self.sdk
                    .set_parameter(camera, CameraParam::AutoExposure, (value <= 0.0) as i32);
                if value > 0.0 {
                    // [0, 255] -> [0, 511]
                    self.sdk
                        .set_parameter(camera, CameraParam::Exposure, (value * 2.0) as i32);
                }
                true
            }
            // Changing the frame mode requires reopening the device.
            CaptureProperty::FrameRate
            | CaptureProperty::FrameHeight
            | CaptureProperty::FrameWidth => false,
            CaptureProperty::Gain => {
                self.sdk
                    .set_parameter(camera, CameraParam::AutoGain, (value <= 0.0) as i32);
                if value > 0.0 {
                    // [0, 255] -> [0, 79]
                    self.sdk.set_parameter(
                        camera,
                        CameraParam::Gain,
                        (value * 80.0 / 256.0).ceil() as i32,
                    );
                }
                true
            }
            CaptureProperty::Hue => false,
            CaptureProperty::Sharpness => false,
        }
    }

    fn domain(&self) -> Domain {
        Domain::MultiCam
    }
}

impl Drop for MultiCamCapture {
    fn drop(&mut self) {
        self.close();
    }
}
