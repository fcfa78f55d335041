//! Volume-meter subsystem
//!
//! The bridge's exemplar remote object: native meters registered under
//! opaque ids, a reference-counted callback bridge onto the native levels
//! hook, and rate-limited telemetry broadcast to host clients.
//!
//! # Data flow
//!
//! ```text
//!   RPC dispatch ──► VolmeterManager ──► IdRegistry<Volmeter>
//!                           │                    ▲
//!                 install / retract              │ find(token.meter_id)
//!                           ▼                    │
//!   audio thread ──► MeterHook::on_levels ──► TelemetryBroadcaster
//!                                                │ decimate, sanitize,
//!                                                │ encode f32-LE frame
//!                                                ▼
//!                                       ClientSet::broadcast_hosts
//! ```

pub mod callback;
pub mod manager;
pub mod meter;
pub mod telemetry;

pub use callback::CallbackToken;
pub use manager::VolmeterManager;
pub use meter::Volmeter;
pub use telemetry::{
    encode_levels, sanitize_level, TelemetryBroadcaster, PUSH_COLLECTION, PUSH_EVENT,
    SILENCE_FLOOR_DB,
};
