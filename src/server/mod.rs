//! Transport-facing surface
//!
//! The transport itself lives outside this crate; what it needs from the
//! bridge is here: a client set to register push channels into and the
//! composition-root context its dispatch loop borrows.

pub mod clients;
pub mod context;

pub use clients::{ClientSet, PushCall};
pub use context::ServerContext;
