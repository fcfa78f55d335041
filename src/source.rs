//! Native source registry
//!
//! Sources live in their own registry, separate from meters; `Attach`
//! resolves each id through its respective registry. Only the surface the
//! meter subsystem needs is exposed here — registration so the transport can
//! project sources to the remote side, and resolution for attachment.

use std::sync::Arc;

use crate::error::{BridgeError, RefKind};
use crate::native::NativeSource;
use crate::registry::IdRegistry;

/// A registered native source
pub struct SourceEntry {
    native: Arc<dyn NativeSource>,
}

impl SourceEntry {
    /// The underlying native source
    pub fn native(&self) -> &Arc<dyn NativeSource> {
        &self.native
    }

    /// Source name, for diagnostics
    pub fn name(&self) -> &str {
        self.native.name()
    }
}

/// Registry of native sources
pub struct SourceManager {
    registry: IdRegistry<SourceEntry>,
}

impl SourceManager {
    /// Create an empty source manager
    pub fn new() -> Self {
        Self {
            registry: IdRegistry::new(),
        }
    }

    /// Register a native source, returning its assigned id
    pub fn register(&self, native: Arc<dyn NativeSource>) -> Result<u64, BridgeError> {
        let entry = Arc::new(SourceEntry { native });
        let id = self
            .registry
            .allocate(entry)
            .map_err(|_| BridgeError::AllocationExhausted)?;
        tracing::info!(id, "source registered");
        Ok(id)
    }

    /// Resolve a source id
    pub fn find(&self, id: u64) -> Option<Arc<SourceEntry>> {
        self.registry.find(id)
    }

    /// Remove a source from the registry
    pub fn unregister(&self, id: u64) -> Result<(), BridgeError> {
        self.registry
            .free(id)
            .map(|_| tracing::info!(id, "source unregistered"))
            .ok_or(BridgeError::InvalidReference(RefKind::Source))
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no sources are registered
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Drop every source mapping (shutdown)
    pub fn clear(&self) {
        self.registry.clear();
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}
