//! Volume-meter resource handle

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::native::NativeMeter;

use super::callback::CallbackSlot;

/// A native volume meter plus the bridge's bookkeeping for it
///
/// Shared-ownership is mandatory: the registry holds one `Arc`, and an
/// in-flight levels callback may hold another, so a concurrent destroy never
/// frees state the audio thread is still reading.
pub struct Volmeter {
    id: u64,
    native: Arc<dyn NativeMeter>,
    callback: Mutex<CallbackSlot>,
    decimation: AtomicU32,
    last_channel_count: AtomicU32,
}

impl Volmeter {
    pub(crate) fn new(id: u64, native: Arc<dyn NativeMeter>) -> Self {
        Self {
            id,
            native,
            callback: Mutex::new(CallbackSlot::default()),
            decimation: AtomicU32::new(0),
            last_channel_count: AtomicU32::new(0),
        }
    }

    /// Registry-assigned identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The underlying native meter
    pub fn native(&self) -> &Arc<dyn NativeMeter> {
        &self.native
    }

    pub(crate) fn callback_slot(&self) -> MutexGuard<'_, CallbackSlot> {
        self.callback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one hook invocation; returns the running total
    pub(crate) fn bump_decimation(&self) -> u32 {
        self.decimation.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn reset_decimation(&self) {
        self.decimation.store(0, Ordering::Relaxed);
    }

    pub(crate) fn set_last_channel_count(&self, channels: u32) {
        self.last_channel_count.store(channels, Ordering::Relaxed);
    }

    /// Channel count observed at the most recent encode
    pub fn last_channel_count(&self) -> u32 {
        self.last_channel_count.load(Ordering::Relaxed)
    }
}
