//! Unique-id allocator and resource registry
//!
//! Every remote-object manager in the bridge specializes this registry: it
//! issues opaque 64-bit identifiers for native resources and resolves them
//! back to live `Arc` handles under concurrent access from dispatch threads
//! and the native audio thread.
//!
//! # Ownership
//!
//! The registry holds one `Arc` per live entry; `find` hands out another.
//! A `free` racing an in-flight native callback is therefore safe: the
//! callback either observes a missing mapping (no-op) or a handle its own
//! `Arc` keeps alive until the invocation returns.

pub mod error;
pub mod store;

pub use error::RegistryError;
pub use store::{IdRegistry, RESERVED_ID};
