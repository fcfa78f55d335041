//! Server composition root
//!
//! One explicitly constructed context per process owns every manager and
//! the shared client set; dispatch handlers receive it by reference. This
//! replaces hidden global singletons while keeping single-instance
//! semantics.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::native::AudioBackend;
use crate::source::SourceManager;
use crate::volmeter::VolmeterManager;

use super::clients::ClientSet;

/// Everything dispatch handlers need, owned in one place
pub struct ServerContext {
    /// Volume-meter lifetime manager
    pub volmeters: VolmeterManager,
    /// Native source registry
    pub sources: SourceManager,
    clients: Arc<ClientSet>,
}

impl ServerContext {
    /// Create a context with default configuration
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self::with_config(backend, BridgeConfig::default())
    }

    /// Create a context with custom configuration
    pub fn with_config(backend: Arc<dyn AudioBackend>, config: BridgeConfig) -> Self {
        let clients = Arc::new(ClientSet::new());
        Self {
            volmeters: VolmeterManager::new(backend, Arc::clone(&clients), &config),
            sources: SourceManager::new(),
            clients,
        }
    }

    /// The shared client set the transport registers connections into
    pub fn clients(&self) -> &Arc<ClientSet> {
        &self.clients
    }

    /// Tear the bridge down
    ///
    /// Takes the context by value: once shutdown starts no dispatch handler
    /// can hold a reference, so dispatch is quiesced before anything is
    /// cleared. Every installed native callback is retracted before any
    /// meter handle is released.
    pub fn shutdown(self) {
        self.volmeters.clear_all();
        self.sources.clear();
        tracing::info!("bridge shut down");
    }
}
