//! Fake storage and driver-probe implementations.

use crate::driver::DriverProbe;
use crate::errors::CameraError;
use crate::settings::{DriverSettings, SettingsStore};
use std::sync::{Arc, Mutex};

/// Shared state behind a [`MemorySettingsStore`].
#[derive(Debug, Clone)]
pub struct MemoryStoreState {
    pub settings: DriverSettings,
    pub fail_loads: u32,
    pub save_count: u32,
}

/// In-memory [`SettingsStore`] with injectable load failures.
pub struct MemorySettingsStore {
    state: Arc<Mutex<MemoryStoreState>>,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryStoreState {
                settings: DriverSettings::default(),
                fail_loads: 0,
                save_count: 0,
            })),
        }
    }
}

impl MemorySettingsStore {
    /// Handle to the shared state for assertions after the store has
    /// been boxed away.
    pub fn handle(&self) -> Arc<Mutex<MemoryStoreState>> {
        self.state.clone()
    }

    /// Make the next `count` loads fail.
    pub fn fail_next_loads(&self, count: u32) {
        self.state.lock().unwrap().fail_loads = count;
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<DriverSettings, CameraError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_loads > 0 {
            state.fail_loads -= 1;
            return Err(CameraError::SettingsError(
                "injected store failure".to_string(),
            ));
        }
        Ok(state.settings.clone())
    }

    fn save(&self, settings: &DriverSettings) -> Result<(), CameraError> {
        let mut state = self.state.lock().unwrap();
        state.settings = settings.clone();
        state.save_count += 1;
        Ok(())
    }
}

/// [`DriverProbe`] answering a fixed provider name.
pub struct StaticProbe {
    provider: Option<String>,
}

impl StaticProbe {
    /// Probe reporting `name` as the installed driver's provider.
    pub fn detected(name: &str) -> Self {
        Self {
            provider: Some(name.to_string()),
        }
    }

    /// Probe reporting no installed driver entry.
    pub fn absent() -> Self {
        Self { provider: None }
    }
}

impl DriverProbe for StaticProbe {
    fn provider_name(&self, _vendor_id: u16, _product_id: u16) -> Option<String> {
        self.provider.clone()
    }
}
