//! Scriptable fake of the multi-camera vendor DLL.

use crate::sdk::{
    CameraHandle, CameraParam, CameraUuid, ColorMode, MulticamSdk, Resolution, SdkError,
};
use crate::testing::synthetic::synthetic_bgra_frame;
use crate::types::FrameOrigin;
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-device script for a [`FakeMulticamSdk`].
#[derive(Debug, Clone)]
pub struct FakeMulticamDevice {
    pub uuid: CameraUuid,
    pub width: u32,
    pub height: u32,
    pub origin: FrameOrigin,
    pub fail_create: bool,
    pub fail_start: bool,
    /// Every frame fetch reports a timeout.
    pub time_out_frames: bool,
}

impl FakeMulticamDevice {
    pub fn new(serial: u8) -> Self {
        Self {
            uuid: [serial; 16],
            width: 640,
            height: 480,
            origin: FrameOrigin::TopLeft,
            fail_create: false,
            fail_start: false,
            time_out_frames: false,
        }
    }
}

struct OpenCamera {
    device: usize,
    params: HashMap<CameraParam, i32>,
    frames_served: u64,
}

#[derive(Default)]
struct MulticamState {
    devices: Vec<FakeMulticamDevice>,
    open: HashMap<u64, OpenCamera>,
    next_handle: u64,
    param_history: Vec<(CameraParam, i32)>,
    created: u32,
    started: u32,
    stopped: u32,
    destroyed: u32,
}

/// In-memory [`MulticamSdk`] implementation for offline tests.
///
/// Records every parameter write and lifecycle call so tests can assert
/// what an adapter did to the device.
pub struct FakeMulticamSdk {
    state: Mutex<MulticamState>,
}

impl FakeMulticamSdk {
    pub fn new(devices: Vec<FakeMulticamDevice>) -> Self {
        Self {
            state: Mutex::new(MulticamState {
                devices,
                ..MulticamState::default()
            }),
        }
    }

    /// Fake with `count` default VGA devices.
    pub fn with_devices(count: u8) -> Self {
        Self::new((0..count).map(FakeMulticamDevice::new).collect())
    }

    /// Parameter value of the single open camera, if any.
    pub fn open_parameter(&self, param: CameraParam) -> Option<i32> {
        let state = self.state.lock().unwrap();
        state
            .open
            .values()
            .next()
            .and_then(|camera| camera.params.get(&param).copied())
    }

    /// Every parameter write, in call order.
    pub fn parameter_history(&self) -> Vec<(CameraParam, i32)> {
        self.state.lock().unwrap().param_history.clone()
    }

    /// (created, started, stopped, destroyed) call counts.
    pub fn lifecycle_counts(&self) -> (u32, u32, u32, u32) {
        let state = self.state.lock().unwrap();
        (state.created, state.started, state.stopped, state.destroyed)
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().unwrap().open.len()
    }
}

impl MulticamSdk for FakeMulticamSdk {
    fn camera_count(&self) -> u32 {
        self.state.lock().unwrap().devices.len() as u32
    }

    fn camera_uuid(&self, index: u32) -> Option<CameraUuid> {
        self.state
            .lock()
            .unwrap()
            .devices
            .get(index as usize)
            .map(|device| device.uuid)
    }

    fn create_camera(
        &self,
        uuid: CameraUuid,
        _mode: ColorMode,
        _resolution: Resolution,
        _fps: u32,
    ) -> Result<CameraHandle, SdkError> {
        let mut state = self.state.lock().unwrap();

        let device = state
            .devices
            .iter()
            .position(|d| d.uuid == uuid)
            .ok_or_else(|| SdkError::Unavailable("unknown camera uuid".to_string()))?;

        if state.devices[device].fail_create {
            return Err(SdkError::Failed("injected create failure".to_string()));
        }

        state.next_handle += 1;
        let handle = state.next_handle;
        state.created += 1;
        state.open.insert(
            handle,
            OpenCamera {
                device,
                params: HashMap::new(),
                frames_served: 0,
            },
        );
        Ok(CameraHandle(handle))
    }

    fn destroy_camera(&self, camera: CameraHandle) {
        let mut state = self.state.lock().unwrap();
        if state.open.remove(&camera.0).is_some() {
            state.destroyed += 1;
        }
    }

    fn start_camera(&self, camera: CameraHandle) -> Result<(), SdkError> {
        let mut state = self.state.lock().unwrap();
        let device = match state.open.get(&camera.0) {
            Some(open) => open.device,
            None => return Err(SdkError::Unavailable("stale camera handle".to_string())),
        };
        if state.devices[device].fail_start {
            return Err(SdkError::Failed("injected start failure".to_string()));
        }
        state.started += 1;
        Ok(())
    }

    fn stop_camera(&self, camera: CameraHandle) {
        let mut state = self.state.lock().unwrap();
        if state.open.contains_key(&camera.0) {
            state.stopped += 1;
        }
    }

    fn frame_dimensions(&self, camera: CameraHandle) -> (u32, u32) {
        let state = self.state.lock().unwrap();
        match state.open.get(&camera.0) {
            Some(open) => {
                let device = &state.devices[open.device];
                (device.width, device.height)
            }
            None => (0, 0),
        }
    }

    fn get_frame(
        &self,
        camera: CameraHandle,
        dst: &mut [u8],
        _timeout_ms: u32,
    ) -> Result<FrameOrigin, SdkError> {
        let mut state = self.state.lock().unwrap();
        let (device, frame_number) = match state.open.get_mut(&camera.0) {
            Some(open) => {
                let frame_number = open.frames_served;
                open.frames_served += 1;
                (open.device, frame_number)
            }
            None => return Err(SdkError::Unavailable("stale camera handle".to_string())),
        };

        let script = state.devices[device].clone();
        if script.time_out_frames {
            return Err(SdkError::Timeout);
        }

        let frame = synthetic_bgra_frame(frame_number, script.width, script.height);
        dst.copy_from_slice(&frame);
        Ok(script.origin)
    }

    fn set_parameter(&self, camera: CameraHandle, param: CameraParam, value: i32) -> bool {
        let mut state = self.state.lock().unwrap();
        state.param_history.push((param, value));
        match state.open.get_mut(&camera.0) {
            Some(open) => {
                open.params.insert(param, value);
                true
            }
            None => false,
        }
    }

    fn parameter(&self, camera: CameraHandle, param: CameraParam) -> i32 {
        let state = self.state.lock().unwrap();
        state
            .open
            .get(&camera.0)
            .and_then(|open| open.params.get(&param).copied())
            .unwrap_or(0)
    }
}
