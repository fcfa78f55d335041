//! Telemetry encoding and broadcast
//!
//! The hot path: runs on the native audio thread for every levels callback,
//! decimates the rate, sanitizes and frames the per-channel floats, and
//! pushes the buffer to every host client. The registry lock is released
//! before the client-set lock is taken, and nothing here ever blocks on
//! transport I/O or raises an error back to the audio thread.

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::BridgeConfig;
use crate::dispatch::Value;
use crate::registry::IdRegistry;
use crate::server::{ClientSet, PushCall};

use super::callback::CallbackToken;
use super::meter::Volmeter;

/// Collection name carried by telemetry push calls
pub const PUSH_COLLECTION: &str = "Volmeter";

/// Event name carried by telemetry push calls
pub const PUSH_EVENT: &str = "UpdateVolmeter";

/// dB floor substituted for negative non-finite level values
pub const SILENCE_FLOOR_DB: f32 = -65535.0;

/// Replace non-finite level values before they reach the wire
///
/// Finite values pass through unchanged; a non-finite non-negative value
/// clamps to 0 dBFS, anything else to the silence floor.
pub fn sanitize_level(raw: f32) -> f32 {
    if raw.is_finite() {
        raw
    } else if raw.is_sign_negative() {
        SILENCE_FLOOR_DB
    } else {
        0.0
    }
}

/// Frame per-channel levels into the wire buffer
///
/// Layout: `channels * 3` little-endian f32s, channel-major
/// `[magnitude, peak, input_peak]`.
pub fn encode_levels(channels: usize, magnitude: &[f32], peak: &[f32], input_peak: &[f32]) -> Bytes {
    let mut buf = BytesMut::with_capacity(channels * 3 * std::mem::size_of::<f32>());
    for ch in 0..channels {
        buf.put_f32_le(sanitize_level(magnitude[ch]));
        buf.put_f32_le(sanitize_level(peak[ch]));
        buf.put_f32_le(sanitize_level(input_peak[ch]));
    }
    buf.freeze()
}

/// Bridges the native levels callback into client push notifications
pub struct TelemetryBroadcaster {
    meters: Arc<IdRegistry<Volmeter>>,
    clients: Arc<ClientSet>,
    decimation_interval: u32,
    max_channels: usize,
}

impl TelemetryBroadcaster {
    pub(crate) fn new(
        meters: Arc<IdRegistry<Volmeter>>,
        clients: Arc<ClientSet>,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            meters,
            clients,
            decimation_interval: config.decimation_interval.max(1),
            max_channels: config.max_channels,
        }
    }

    /// One native callback invocation
    ///
    /// Re-resolves the meter by the token's id; a missing mapping means the
    /// meter was destroyed while this invocation was in flight, which is a
    /// silent no-op.
    pub(crate) fn on_levels(
        &self,
        token: &CallbackToken,
        magnitude: &[f32],
        peak: &[f32],
        input_peak: &[f32],
    ) {
        let Some(meter) = self.meters.find(token.meter_id()) else {
            return;
        };

        if meter.bump_decimation() < self.decimation_interval {
            return;
        }
        meter.reset_decimation();

        let channels = (meter.native().channel_count() as usize)
            .min(self.max_channels)
            .min(magnitude.len())
            .min(peak.len())
            .min(input_peak.len());
        meter.set_last_channel_count(channels as u32);

        let data = encode_levels(channels, magnitude, peak, input_peak);
        let call = PushCall::new(
            PUSH_COLLECTION,
            PUSH_EVENT,
            vec![
                Value::UInt64(meter.id()),
                Value::UInt32(channels as u32),
                Value::Binary(data),
            ],
        );

        let delivered = self.clients.broadcast_hosts(&call);
        tracing::trace!(
            id = meter.id(),
            channels,
            delivered,
            "telemetry frame broadcast"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_finite_passthrough() {
        assert_eq!(sanitize_level(-12.5), -12.5);
        assert_eq!(sanitize_level(0.0), 0.0);
        assert_eq!(sanitize_level(3.0), 3.0);
    }

    #[test]
    fn test_sanitize_nan_is_zero() {
        assert_eq!(sanitize_level(f32::NAN), 0.0);
    }

    #[test]
    fn test_sanitize_infinities() {
        assert_eq!(sanitize_level(f32::INFINITY), 0.0);
        assert_eq!(sanitize_level(f32::NEG_INFINITY), SILENCE_FLOOR_DB);
    }

    #[test]
    fn test_encode_layout() {
        let magnitude = [-10.0f32, -20.0];
        let peak = [-5.0f32, -15.0];
        let input_peak = [-3.0f32, -13.0];

        let buf = encode_levels(2, &magnitude, &peak, &input_peak);
        assert_eq!(buf.len(), 2 * 3 * 4);

        let read = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&buf[i * 4..i * 4 + 4]);
            f32::from_le_bytes(raw)
        };

        // Channel-major [magnitude, peak, input_peak]
        assert_eq!(read(0), -10.0);
        assert_eq!(read(1), -5.0);
        assert_eq!(read(2), -3.0);
        assert_eq!(read(3), -20.0);
        assert_eq!(read(4), -15.0);
        assert_eq!(read(5), -13.0);
    }

    #[test]
    fn test_encode_sanitizes() {
        let buf = encode_levels(1, &[f32::NAN], &[f32::NEG_INFINITY], &[1.0]);

        let mut raw = [0u8; 4];
        raw.copy_from_slice(&buf[0..4]);
        assert_eq!(f32::from_le_bytes(raw), 0.0);
        raw.copy_from_slice(&buf[4..8]);
        assert_eq!(f32::from_le_bytes(raw), SILENCE_FLOOR_DB);
        raw.copy_from_slice(&buf[8..12]);
        assert_eq!(f32::from_le_bytes(raw), 1.0);
    }
}
