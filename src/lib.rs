//! Remote-object bridge for native audio volume meters
//!
//! This crate sits inside a media engine's out-of-process server and
//! exposes native audio primitives to a remote front end. Remote proxies
//! hold opaque 64-bit ids; the bridge owns the native handles, resolves ids
//! under concurrent access, and guarantees a handle never outlives or leaks
//! relative to its proxy.
//!
//! # Architecture
//!
//! - [`registry`] — thread-safe id allocation and resolution, the foundation
//!   every manager specializes
//! - [`native`] — the traits the underlying media library is seen through
//! - [`volmeter`] — meter lifetimes, the reference-counted callback bridge,
//!   and telemetry encoding/broadcast
//! - [`source`] — the sibling registry `Attach` resolves sources through
//! - [`dispatch`] — typed RPC routing and the `VolMeter` endpoints
//! - [`server`] — the client set and the dependency-injected composition
//!   root
//!
//! Two execution contexts meet here: RPC dispatch threads and the native
//! real-time audio thread driving the levels callback. The registry mutex
//! is their single serialization point; shared `Arc` ownership makes a
//! destroy racing an in-flight callback safe, and telemetry delivery is
//! per-client best-effort so the audio thread never sees a transport
//! failure.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use volbridge::dispatch::{self, DispatchTable, Value};
//! use volbridge::native::AudioBackend;
//! use volbridge::server::ServerContext;
//!
//! fn run(backend: Arc<dyn AudioBackend>) {
//!     let ctx = ServerContext::new(backend);
//!     let mut table = DispatchTable::new();
//!     dispatch::volmeter::register(&mut table).expect("fresh table");
//!
//!     let reply = table.call(&ctx, "VolMeter", "Create", &[Value::Int32(0)]);
//!     assert_eq!(reply[0].as_u64(), Some(0)); // Ok
//!
//!     // ... transport loop dispatches calls and drains push channels ...
//!     ctx.shutdown();
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod native;
pub mod registry;
pub mod server;
pub mod source;
pub mod volmeter;

pub use config::BridgeConfig;
pub use dispatch::{DispatchTable, Value, ValueKind};
pub use error::{BridgeError, ErrorCode, RefKind};
pub use registry::{IdRegistry, RegistryError};
pub use server::{ClientSet, PushCall, ServerContext};
pub use source::SourceManager;
pub use volmeter::VolmeterManager;
