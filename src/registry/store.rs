//! Identifier-to-resource registry
//!
//! The central map from opaque 64-bit identifiers to shared-ownership
//! handles. Remote proxies hold the id, never the resource; this registry
//! is the only authoritative mapping, shared between RPC dispatch threads
//! and the native audio callback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::RegistryError;

/// Sentinel id reserved for exhaustion signaling; never issued
pub const RESERVED_ID: u64 = u64::MAX;

/// Thread-safe registry of `Arc<T>` handles keyed by unique u64 ids
///
/// Ids are issued monotonically starting at 1 and never reused, so a stale
/// id cached on the remote side can never collide with a later allocation.
/// All operations take a single mutex held only for pointer-copy-sized
/// critical sections.
pub struct IdRegistry<T> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    entries: HashMap<u64, Arc<T>>,
    next_id: u64,
}

impl<T> IdRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    fn starting_at(first_id: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                next_id: first_id,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panic while holding the lock leaves the map structurally intact,
        // so recover the guard rather than poisoning every later caller.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a handle under a freshly chosen id
    pub fn allocate(&self, resource: Arc<T>) -> Result<u64, RegistryError> {
        let mut inner = self.lock();
        let id = Self::next_id(&mut inner)?;
        inner.entries.insert(id, resource);
        Ok(id)
    }

    /// Choose a fresh id, build the handle with it, and store it
    ///
    /// Used when the handle itself records its assigned id; the constructor
    /// runs inside the critical section, so keep it allocation-cheap.
    pub fn allocate_with<F>(&self, make: F) -> Result<(u64, Arc<T>), RegistryError>
    where
        F: FnOnce(u64) -> Arc<T>,
    {
        let mut inner = self.lock();
        let id = Self::next_id(&mut inner)?;
        let resource = make(id);
        inner.entries.insert(id, Arc::clone(&resource));
        Ok((id, resource))
    }

    fn next_id(inner: &mut Inner<T>) -> Result<u64, RegistryError> {
        if inner.next_id == RESERVED_ID {
            return Err(RegistryError::Exhausted);
        }
        let id = inner.next_id;
        inner.next_id += 1;
        Ok(id)
    }

    /// Resolve an id to a live handle
    pub fn find(&self, id: u64) -> Option<Arc<T>> {
        self.lock().entries.get(&id).cloned()
    }

    /// Remove the mapping for an id
    ///
    /// Returns the handle so the caller can finish teardown; the resource
    /// itself is destroyed when the last owner releases it.
    pub fn free(&self, id: u64) -> Option<Arc<T>> {
        self.lock().entries.remove(&id)
    }

    /// Copy every live handle out of the map
    ///
    /// Shutdown support: visitors run on the copy without holding the lock.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.lock().entries.values().cloned().collect()
    }

    /// Drop every mapping
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for IdRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
