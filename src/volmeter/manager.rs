//! Volume-meter lifetime manager
//!
//! Owns allocation and destruction of native meters, delegates identifier
//! bookkeeping to the registry, and fronts the callback bridge. One instance
//! per server, constructed by the composition root and reached through it —
//! never through global state.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, RefKind};
use crate::native::{AudioBackend, FaderType};
use crate::registry::IdRegistry;
use crate::server::ClientSet;
use crate::source::SourceManager;

use super::callback;
use super::meter::Volmeter;
use super::telemetry::TelemetryBroadcaster;

/// Manager for volume-meter resources
pub struct VolmeterManager {
    backend: Arc<dyn AudioBackend>,
    meters: Arc<IdRegistry<Volmeter>>,
    broadcaster: Arc<TelemetryBroadcaster>,
}

impl VolmeterManager {
    /// Create a manager broadcasting to the given client set
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        clients: Arc<ClientSet>,
        config: &BridgeConfig,
    ) -> Self {
        let meters = Arc::new(IdRegistry::new());
        let broadcaster = Arc::new(TelemetryBroadcaster::new(
            Arc::clone(&meters),
            clients,
            config,
        ));
        Self {
            backend,
            meters,
            broadcaster,
        }
    }

    /// Construct a native meter and register it
    ///
    /// Returns the assigned id and the meter's current update interval. A
    /// registry exhaustion failure releases the just-constructed native
    /// meter rather than leaking it.
    pub fn create(&self, fader: FaderType) -> Result<(u64, u32), BridgeError> {
        let native = self
            .backend
            .create_meter(fader)
            .map_err(|e| BridgeError::CreationFailed(e.to_string()))?;

        let (id, meter) = self
            .meters
            .allocate_with(|id| Arc::new(Volmeter::new(id, Arc::clone(&native))))
            .map_err(|_| BridgeError::AllocationExhausted)?;

        let interval = meter.native().update_interval();
        tracing::info!(id, fader = ?fader, interval, "volmeter created");
        Ok((id, interval))
    }

    /// Destroy a meter
    ///
    /// Retracts any installed callback before releasing the registry
    /// mapping, so the audio thread can never invoke a hook into a freed
    /// meter.
    pub fn destroy(&self, id: u64) -> Result<(), BridgeError> {
        let meter = self.find(id)?;
        callback::retract(&meter);
        self.meters.free(id);
        tracing::info!(id, "volmeter destroyed");
        Ok(())
    }

    /// Read the meter's update interval in milliseconds
    pub fn update_interval(&self, id: u64) -> Result<u32, BridgeError> {
        let meter = self.find(id)?;
        Ok(meter.native().update_interval())
    }

    /// Write the meter's update interval; echoes the resulting value
    pub fn set_update_interval(&self, id: u64, millis: u32) -> Result<u32, BridgeError> {
        let meter = self.find(id)?;
        meter.native().set_update_interval(millis);
        Ok(meter.native().update_interval())
    }

    /// Attach a source to a meter, superseding any previous attachment
    ///
    /// Both ids resolve through their own registries; a native rejection of
    /// the pairing surfaces as `OperationFailed`.
    pub fn attach(
        &self,
        meter_id: u64,
        source_id: u64,
        sources: &SourceManager,
    ) -> Result<(), BridgeError> {
        let meter = self.find(meter_id)?;
        let source = sources
            .find(source_id)
            .ok_or(BridgeError::InvalidReference(RefKind::Source))?;

        if !meter.native().attach_source(source.native()) {
            return Err(BridgeError::OperationFailed(
                "Error attaching source.".into(),
            ));
        }

        tracing::info!(meter = meter_id, source = source_id, "source attached");
        Ok(())
    }

    /// Clear a meter's attachment; idempotent when already detached
    pub fn detach(&self, id: u64) -> Result<(), BridgeError> {
        let meter = self.find(id)?;
        meter.native().detach_source();
        tracing::info!(id, "source detached");
        Ok(())
    }

    /// Add a logical telemetry subscriber; returns the updated refcount
    pub fn add_callback(&self, id: u64) -> Result<u32, BridgeError> {
        let meter = self.find(id)?;
        Ok(callback::add(&meter, &self.broadcaster))
    }

    /// Remove a logical telemetry subscriber; returns the updated refcount
    pub fn remove_callback(&self, id: u64) -> Result<u32, BridgeError> {
        let meter = self.find(id)?;
        Ok(callback::remove(&meter))
    }

    /// Resolve a meter id
    pub fn find(&self, id: u64) -> Result<Arc<Volmeter>, BridgeError> {
        self.meters
            .find(id)
            .ok_or(BridgeError::InvalidReference(RefKind::Meter))
    }

    /// Number of live meters
    pub fn len(&self) -> usize {
        self.meters.len()
    }

    /// Whether no meters are live
    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }

    /// Shutdown: retract every installed callback, then release all meters
    ///
    /// The retraction pass completes before any handle is released; callers
    /// must have quiesced dispatch first (the composition root enforces this
    /// by consuming itself on shutdown).
    pub fn clear_all(&self) {
        let meters = self.meters.snapshot();
        for meter in &meters {
            callback::retract(meter);
        }
        self.meters.clear();
        tracing::info!(count = meters.len(), "all volmeters cleared");
    }
}
