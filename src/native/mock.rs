//! Mock audio backend for tests
//!
//! Records meter state transitions and lets tests drive synthetic levels
//! callbacks, standing in for the real media library.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use super::{AudioBackend, FaderType, LevelsHandler, NativeError, NativeMeter, NativeSource};

/// Default update interval of a freshly created mock meter, in milliseconds
pub const MOCK_UPDATE_INTERVAL: u32 = 50;

/// Backend producing [`MockMeter`]s
#[derive(Default)]
pub struct MockBackend {
    /// When set, `create_meter` fails
    pub fail_create: AtomicBool,
    created: Mutex<Vec<Arc<MockMeter>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The n-th meter this backend created
    pub fn meter(&self, index: usize) -> Arc<MockMeter> {
        Arc::clone(&self.created.lock().unwrap()[index])
    }
}

impl AudioBackend for MockBackend {
    fn create_meter(&self, fader: FaderType) -> Result<Arc<dyn NativeMeter>, NativeError> {
        if self.fail_create.load(Ordering::Relaxed) {
            return Err(NativeError::new("mock construction failure"));
        }
        let meter = Arc::new(MockMeter::new(fader));
        self.created.lock().unwrap().push(Arc::clone(&meter));
        Ok(meter)
    }
}

/// In-memory meter that counts installs/retractions and replays levels
pub struct MockMeter {
    pub fader: FaderType,
    interval: AtomicU32,
    channels: AtomicU32,
    attached: Mutex<Option<String>>,
    handler: Mutex<Option<Arc<dyn LevelsHandler>>>,
    /// Total `install_callback` calls observed
    pub installs: AtomicU32,
    /// Total `remove_callback` calls observed
    pub removals: AtomicU32,
    /// When set, `attach_source` rejects the pairing
    pub reject_attach: AtomicBool,
}

impl MockMeter {
    fn new(fader: FaderType) -> Self {
        Self {
            fader,
            interval: AtomicU32::new(MOCK_UPDATE_INTERVAL),
            channels: AtomicU32::new(2),
            attached: Mutex::new(None),
            handler: Mutex::new(None),
            installs: AtomicU32::new(0),
            removals: AtomicU32::new(0),
            reject_attach: AtomicBool::new(false),
        }
    }

    /// Change the reported channel configuration
    pub fn set_channel_count(&self, channels: u32) {
        self.channels.store(channels, Ordering::Relaxed);
    }

    /// Name of the currently attached source, if any
    pub fn attached_source(&self) -> Option<String> {
        self.attached.lock().unwrap().clone()
    }

    /// Whether a callback is currently installed
    pub fn callback_installed(&self) -> bool {
        self.handler.lock().unwrap().is_some()
    }

    /// Clone of the installed handler, as an in-flight invocation would hold
    pub fn installed_handler(&self) -> Option<Arc<dyn LevelsHandler>> {
        self.handler.lock().unwrap().clone()
    }

    /// Drive one synthetic levels callback, as the audio thread would
    pub fn fire(&self, magnitude: &[f32], peak: &[f32], input_peak: &[f32]) {
        let handler = self.handler.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler.on_levels(magnitude, peak, input_peak);
        }
    }
}

impl NativeMeter for MockMeter {
    fn update_interval(&self) -> u32 {
        self.interval.load(Ordering::Relaxed)
    }

    fn set_update_interval(&self, millis: u32) {
        self.interval.store(millis, Ordering::Relaxed);
    }

    fn channel_count(&self) -> u32 {
        self.channels.load(Ordering::Relaxed)
    }

    fn attach_source(&self, source: &Arc<dyn NativeSource>) -> bool {
        if self.reject_attach.load(Ordering::Relaxed) {
            return false;
        }
        *self.attached.lock().unwrap() = Some(source.name().to_string());
        true
    }

    fn detach_source(&self) {
        *self.attached.lock().unwrap() = None;
    }

    fn install_callback(&self, handler: Arc<dyn LevelsHandler>) {
        self.installs.fetch_add(1, Ordering::SeqCst);
        *self.handler.lock().unwrap() = Some(handler);
    }

    fn remove_callback(&self) {
        self.removals.fetch_add(1, Ordering::SeqCst);
        *self.handler.lock().unwrap() = None;
    }
}

/// Named source stub
pub struct MockSource {
    name: String,
}

impl MockSource {
    pub fn new(name: impl Into<String>) -> Arc<dyn NativeSource> {
        Arc::new(Self { name: name.into() })
    }
}

impl NativeSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }
}
