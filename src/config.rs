//! Bridge configuration

use crate::native::MAX_AUDIO_CHANNELS;

/// Default number of hook invocations per broadcast
pub const DEFAULT_DECIMATION_INTERVAL: u32 = 5;

/// Configuration options for the bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Broadcast once every N hook invocations
    pub decimation_interval: u32,

    /// Upper bound on channels encoded per telemetry frame
    pub max_channels: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            decimation_interval: DEFAULT_DECIMATION_INTERVAL,
            max_channels: MAX_AUDIO_CHANNELS,
        }
    }
}

impl BridgeConfig {
    /// Set the decimation interval (minimum 1)
    pub fn decimation_interval(mut self, interval: u32) -> Self {
        self.decimation_interval = interval.max(1);
        self
    }

    /// Set the channel cap, clamped to the native maximum
    pub fn max_channels(mut self, channels: usize) -> Self {
        self.max_channels = channels.min(MAX_AUDIO_CHANNELS);
        self
    }
}
