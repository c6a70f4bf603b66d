//! Trait surface of the multi-camera vendor DLL.

use super::SdkError;
use crate::types::FrameOrigin;

/// Vendor-assigned camera identity (a 16-byte GUID on the wire).
pub type CameraUuid = [u8; 16];

/// Opaque handle to a created camera context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u64);

/// Pixel processing mode requested at camera creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    MonoProcessed,
    ColorProcessed,
    MonoRaw,
    ColorRaw,
}

/// Sensor resolution class requested at camera creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Qvga,
    Vga,
}

/// Numeric camera parameters understood by the DLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraParam {
    AutoGain,
    Gain,
    AutoExposure,
    Exposure,
    AutoWhiteBalance,
    LensBrightness,
}

/// The multi-camera DLL surface driven by
/// [`MultiCamCapture`](crate::backend::multicam::MultiCamCapture).
///
/// Handles are owned by the caller: every `create_camera` must be paired
/// with `destroy_camera`. All calls are expected from the single thread
/// owning the capture object.
pub trait MulticamSdk: Send + Sync {
    /// Number of cameras the DLL currently sees.
    fn camera_count(&self) -> u32;

    /// Identity of the camera at `index`, if present.
    fn camera_uuid(&self, index: u32) -> Option<CameraUuid>;

    /// Create a camera context; the device starts delivering frames
    /// only after [`start_camera`](Self::start_camera).
    fn create_camera(
        &self,
        uuid: CameraUuid,
        mode: ColorMode,
        resolution: Resolution,
        fps: u32,
    ) -> Result<CameraHandle, SdkError>;

    /// Tear down a camera context created by `create_camera`.
    fn destroy_camera(&self, camera: CameraHandle);

    fn start_camera(&self, camera: CameraHandle) -> Result<(), SdkError>;

    fn stop_camera(&self, camera: CameraHandle);

    /// Negotiated frame dimensions for an open context.
    fn frame_dimensions(&self, camera: CameraHandle) -> (u32, u32);

    /// Blocking frame fetch with a bounded timeout.
    ///
    /// Fills `dst` with a packed 4-channel (BGRA) frame and reports the
    /// row order of the delivered image. `dst` must hold
    /// `width * height * 4` bytes.
    fn get_frame(
        &self,
        camera: CameraHandle,
        dst: &mut [u8],
        timeout_ms: u32,
    ) -> Result<FrameOrigin, SdkError>;

    /// Write a camera parameter; false when the DLL rejects it.
    fn set_parameter(&self, camera: CameraHandle, param: CameraParam, value: i32) -> bool;

    /// Read a camera parameter in its native range.
    fn parameter(&self, camera: CameraHandle, param: CameraParam) -> i32;
}
