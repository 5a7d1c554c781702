//! World events for the rendering/UI layers
//!
//! The core never draws anything; it describes state changes as events that
//! the (external) presentation layer drains once per tick.

use serde::{Deserialize, Serialize};

use crate::anomaly::catalog::{AnomalyId, AnomalyKind};
use crate::chunk::coord::ChunkIndex;
use crate::chunk::generator::{ProceduralAnomaly, StaticCluster};
use crate::core::types::Vec2;

/// A state change the presentation layer needs to mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A chunk entered the active radius; carries the content it owns
    ChunkLoaded {
        index: ChunkIndex,
        clusters: Vec<StaticCluster>,
        anomalies: Vec<ProceduralAnomaly>,
    },
    /// A chunk left the active radius; its owned visuals must be released
    ChunkEvicted { index: ChunkIndex },
    /// An anomaly became eligible for rendering and interaction
    AnomalyVisible {
        id: AnomalyId,
        position: Vec2,
        kind: AnomalyKind,
        /// Normalized severity in [0, 1]
        severity: f32,
        backend: bool,
    },
    /// A backend anomaly left the visible set (chunk unloaded or feed dropped it)
    AnomalyHidden { id: AnomalyId },
    /// First sighting of an anomaly this session
    AnomalyDiscovered { id: AnomalyId },
    /// An anomaly was resolved by the player
    AnomalyResolved { id: AnomalyId },
}

/// Per-tick event buffer, drained by the presentation layer
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<WorldEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take all pending events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events without draining
    pub fn pending(&self) -> &[WorldEvent] {
        &self.events
    }
}
