//! Callback bridge
//!
//! Reference-counts logical telemetry subscribers per meter and keeps the
//! native levels callback installed exactly once while any remain. The
//! `Arc<MeterHook>` handed to the native registration is the correlation
//! token: a stable-identity value owning the meter's id, alive exactly as
//! long as the callback is installed.

use std::sync::Arc;

use crate::native::LevelsHandler;

use super::meter::Volmeter;
use super::telemetry::TelemetryBroadcaster;

/// Correlation token threaded through the native callback registration
///
/// Carries only the meter's id; the hook re-resolves the live meter through
/// the registry on every invocation.
pub struct CallbackToken {
    meter_id: u64,
}

impl CallbackToken {
    fn new(meter_id: u64) -> Self {
        Self { meter_id }
    }

    /// Id of the meter this token correlates to
    pub fn meter_id(&self) -> u64 {
        self.meter_id
    }
}

/// The installed native hook: token plus the broadcast path
pub(crate) struct MeterHook {
    token: CallbackToken,
    broadcaster: Arc<TelemetryBroadcaster>,
}

impl LevelsHandler for MeterHook {
    fn on_levels(&self, magnitude: &[f32], peak: &[f32], input_peak: &[f32]) {
        self.broadcaster
            .on_levels(&self.token, magnitude, peak, input_peak);
    }
}

/// Per-meter subscriber bookkeeping
///
/// Invariant: `hook` is `Some` iff `refs > 0`.
#[derive(Default)]
pub(crate) struct CallbackSlot {
    pub(crate) refs: u32,
    pub(crate) hook: Option<Arc<MeterHook>>,
}

/// Add one logical subscriber; installs the native hook on the 0→1 edge
///
/// Returns the updated refcount.
pub(crate) fn add(meter: &Arc<Volmeter>, broadcaster: &Arc<TelemetryBroadcaster>) -> u32 {
    let mut slot = meter.callback_slot();
    slot.refs += 1;
    if slot.refs == 1 {
        let hook = Arc::new(MeterHook {
            token: CallbackToken::new(meter.id()),
            broadcaster: Arc::clone(broadcaster),
        });
        meter.native().install_callback(Arc::clone(&hook) as Arc<dyn LevelsHandler>);
        slot.hook = Some(hook);
        tracing::debug!(id = meter.id(), "levels callback installed");
    }
    slot.refs
}

/// Drop one logical subscriber; retracts the native hook on the 1→0 edge
///
/// The count floors at zero: removing with no subscribers is a caller error
/// and leaves the slot untouched. Returns the updated refcount.
pub(crate) fn remove(meter: &Volmeter) -> u32 {
    let mut slot = meter.callback_slot();
    if slot.refs == 0 {
        tracing::warn!(id = meter.id(), "RemoveCallback with no subscribers");
        return 0;
    }
    slot.refs -= 1;
    if slot.refs == 0 {
        meter.native().remove_callback();
        slot.hook = None;
        tracing::debug!(id = meter.id(), "levels callback retracted");
    }
    slot.refs
}

/// Force-retract the hook regardless of refcount
///
/// Used by destroy and shutdown; the native callback must be gone before the
/// meter handle is released.
pub(crate) fn retract(meter: &Volmeter) {
    let mut slot = meter.callback_slot();
    if slot.hook.is_some() {
        meter.native().remove_callback();
        slot.hook = None;
        tracing::debug!(id = meter.id(), refs = slot.refs, "levels callback force-retracted");
    }
    slot.refs = 0;
}
