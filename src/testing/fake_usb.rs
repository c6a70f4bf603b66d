//! Scriptable fake of the USB-driver-level vendor library.

use crate::sdk::{SdkError, UsbEyeDevice, UsbEyeSdk, UsbFrame};
use crate::testing::synthetic::synthetic_yuv422_frame;
use crate::types::FrameOrigin;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared script and recorded state for one fake USB device.
///
/// Defaults mirror the sensor's power-on values (auto modes engaged,
/// exposure 120, gain 20, contrast 37, hue 143).
#[derive(Debug, Clone)]
pub struct UsbScriptState {
    pub fail_init: bool,
    pub fail_start: bool,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Extra bytes appended to every packed row.
    pub stride_padding: usize,
    pub origin: FrameOrigin,
    pub pending_frames: VecDeque<Vec<u8>>,
    pub auto_gain: bool,
    pub auto_white_balance: bool,
    pub gain: u8,
    pub exposure: u8,
    pub brightness: u8,
    pub contrast: u8,
    pub hue: u8,
    pub sharpness: u8,
    pub inited: bool,
    pub started: bool,
    pub stopped: bool,
    pub updates: u32,
}

impl Default for UsbScriptState {
    fn default() -> Self {
        Self {
            fail_init: false,
            fail_start: false,
            width: 0,
            height: 0,
            fps: 0,
            stride_padding: 0,
            origin: FrameOrigin::TopLeft,
            pending_frames: VecDeque::new(),
            auto_gain: true,
            auto_white_balance: true,
            gain: 20,
            exposure: 120,
            brightness: 20,
            contrast: 37,
            hue: 143,
            sharpness: 0,
            inited: false,
            started: false,
            stopped: false,
            updates: 0,
        }
    }
}

/// Handle to one scripted device; clone freely, state is shared.
#[derive(Clone, Default)]
pub struct UsbScript {
    state: Arc<Mutex<UsbScriptState>>,
}

impl UsbScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the script before (or between) adapter calls.
    pub fn configure<F: FnOnce(&mut UsbScriptState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    /// Copy of the current state for assertions.
    pub fn snapshot(&self) -> UsbScriptState {
        self.state.lock().unwrap().clone()
    }

    /// Queue a synthetic frame sized to the negotiated mode. The
    /// device must have been initialized first.
    pub fn queue_synthetic_frame(&self, frame_number: u64) {
        let mut state = self.state.lock().unwrap();
        assert!(state.inited, "queue frames after the adapter opens");
        let stride = (state.width as usize) * 2 + state.stride_padding;
        let frame = synthetic_yuv422_frame(frame_number, state.width, state.height, stride);
        state.pending_frames.push_back(frame);
    }
}

/// In-memory [`UsbEyeSdk`] implementation for offline tests.
pub struct FakeUsbSdk {
    devices: Vec<UsbScript>,
}

impl FakeUsbSdk {
    pub fn new(devices: Vec<UsbScript>) -> Self {
        Self { devices }
    }

    /// Fake with `count` default devices; keep clones of the scripts
    /// for assertions.
    pub fn with_devices(count: usize) -> (Self, Vec<UsbScript>) {
        let scripts: Vec<UsbScript> = (0..count).map(|_| UsbScript::new()).collect();
        (Self::new(scripts.clone()), scripts)
    }
}

impl UsbEyeSdk for FakeUsbSdk {
    fn device_count(&self) -> u32 {
        self.devices.len() as u32
    }

    fn open_device(&self, index: u32) -> Option<Box<dyn UsbEyeDevice>> {
        self.devices
            .get(index as usize)
            .cloned()
            .map(|script| Box::new(FakeUsbDevice::new(script)) as Box<dyn UsbEyeDevice>)
    }
}

/// Device handle produced by [`FakeUsbSdk::open_device`].
pub struct FakeUsbDevice {
    script: UsbScript,
    current: Option<Vec<u8>>,
    fresh: bool,
    width: u32,
    height: u32,
    fps: u32,
    stride: usize,
    origin: FrameOrigin,
}

impl FakeUsbDevice {
    fn new(script: UsbScript) -> Self {
        Self {
            script,
            current: None,
            fresh: false,
            width: 0,
            height: 0,
            fps: 0,
            stride: 0,
            origin: FrameOrigin::TopLeft,
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut UsbScriptState) -> T) -> T {
        f(&mut self.script.state.lock().unwrap())
    }
}

impl UsbEyeDevice for FakeUsbDevice {
    fn init(&mut self, width: u32, height: u32, fps: u32) -> Result<(), SdkError> {
        let (stride, origin) = self.with_state(|state| {
            if state.fail_init {
                return Err(SdkError::Failed("injected init failure".to_string()));
            }
            state.width = width;
            state.height = height;
            state.fps = fps;
            state.inited = true;
            Ok(((width as usize) * 2 + state.stride_padding, state.origin))
        })?;

        self.width = width;
        self.height = height;
        self.fps = fps;
        self.stride = stride;
        self.origin = origin;
        Ok(())
    }

    fn start(&mut self) -> Result<(), SdkError> {
        self.with_state(|state| {
            if state.fail_start {
                return Err(SdkError::Failed("injected start failure".to_string()));
            }
            state.started = true;
            Ok(())
        })
    }

    fn stop(&mut self) {
        self.with_state(|state| state.stopped = true);
    }

    fn update(&mut self) {
        let next = self.with_state(|state| {
            state.updates += 1;
            state.pending_frames.pop_front()
        });
        match next {
            Some(frame) => {
                self.current = Some(frame);
                self.fresh = true;
            }
            None => self.fresh = false,
        }
    }

    fn new_frame_ready(&self) -> bool {
        self.fresh
    }

    fn last_frame(&mut self) -> Option<UsbFrame<'_>> {
        let stride = self.stride;
        let origin = self.origin;
        self.current.as_deref().map(|pixels| UsbFrame {
            pixels,
            stride,
            origin,
        })
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame_rate(&self) -> u32 {
        self.fps
    }

    fn set_auto_gain(&mut self, enabled: bool) {
        self.with_state(|state| state.auto_gain = enabled);
    }

    fn auto_gain(&self) -> bool {
        self.with_state(|state| state.auto_gain)
    }

    fn set_auto_white_balance(&mut self, enabled: bool) {
        self.with_state(|state| state.auto_white_balance = enabled);
    }

    fn auto_white_balance(&self) -> bool {
        self.with_state(|state| state.auto_white_balance)
    }

    fn gain(&self) -> u8 {
        self.with_state(|state| state.gain)
    }

    fn set_gain(&mut self, value: u8) {
        self.with_state(|state| state.gain = value);
    }

    fn exposure(&self) -> u8 {
        self.with_state(|state| state.exposure)
    }

    fn set_exposure(&mut self, value: u8) {
        self.with_state(|state| state.exposure = value);
    }

    fn brightness(&self) -> u8 {
        self.with_state(|state| state.brightness)
    }

    fn set_brightness(&mut self, value: u8) {
        self.with_state(|state| state.brightness = value);
    }

    fn contrast(&self) -> u8 {
        self.with_state(|state| state.contrast)
    }

    fn set_contrast(&mut self, value: u8) {
        self.with_state(|state| state.contrast = value);
    }

    fn hue(&self) -> u8 {
        self.with_state(|state| state.hue)
    }

    fn set_hue(&mut self, value: u8) {
        self.with_state(|state| state.hue = value);
    }

    fn sharpness(&self) -> u8 {
        self.with_state(|state| state.sharpness)
    }

    fn set_sharpness(&mut self, value: u8) {
        self.with_state(|state| state.sharpness = value);
    }
}
