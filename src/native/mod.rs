//! Native media-library interface
//!
//! The bridge never links the media library directly; it sees it through
//! these traits. A production build implements them over the real fader and
//! meter primitives, tests use the `mock` module. Only the surface the
//! bridge needs is modeled: meter construction, the update interval, source
//! attachment, and the high-frequency levels callback.

use std::sync::Arc;

#[cfg(test)]
pub mod mock;

/// Maximum channels a levels callback reports
pub const MAX_AUDIO_CHANNELS: usize = 8;

/// Fader curve a meter applies to raw levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaderType {
    /// Cubic fader curve
    Cubic,
    /// IEC 60-268-18 standard fader
    IecStd,
    /// Logarithmic fader curve
    Log,
}

impl FaderType {
    /// Decode the wire representation used by `Create`
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(FaderType::Cubic),
            1 => Some(FaderType::IecStd),
            2 => Some(FaderType::Log),
            _ => None,
        }
    }
}

/// Error raised by the native layer
#[derive(Debug, Clone)]
pub struct NativeError {
    message: String,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for NativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NativeError {}

/// Receiver for the native levels callback
///
/// Invoked on the native audio thread at its own cadence, fully
/// asynchronously with respect to RPC dispatch. Implementations must not
/// block and must tolerate the owning meter being destroyed concurrently.
pub trait LevelsHandler: Send + Sync {
    /// One callback invocation with per-channel levels in dB
    fn on_levels(&self, magnitude: &[f32], peak: &[f32], input_peak: &[f32]);
}

/// A native volume-meter instance
pub trait NativeMeter: Send + Sync {
    /// Current update interval in milliseconds
    fn update_interval(&self) -> u32;

    /// Set the update interval in milliseconds
    fn set_update_interval(&self, millis: u32);

    /// Channels in the meter's current audio configuration
    fn channel_count(&self) -> u32;

    /// Attach a source to this meter, superseding any previous attachment
    ///
    /// Returns false if the native layer rejects the pairing.
    fn attach_source(&self, source: &Arc<dyn NativeSource>) -> bool;

    /// Clear the current attachment; a no-op when already detached
    fn detach_source(&self);

    /// Install the levels callback
    ///
    /// The registration owns the handler until [`NativeMeter::remove_callback`];
    /// the bridge guarantees at most one installation per meter at a time.
    fn install_callback(&self, handler: Arc<dyn LevelsHandler>);

    /// Retract the levels callback and release the handler
    fn remove_callback(&self);
}

/// A native audio source, resolvable through its own registry
pub trait NativeSource: Send + Sync {
    /// Source name, for diagnostics
    fn name(&self) -> &str;
}

/// Factory for native meters
pub trait AudioBackend: Send + Sync {
    /// Construct a meter with the given fader curve
    fn create_meter(&self, fader: FaderType) -> Result<Arc<dyn NativeMeter>, NativeError>;
}
