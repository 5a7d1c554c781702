//! Anomaly reconciliation engine
//!
//! Merges two independently evolving content sources: deterministic
//! procedural anomalies owned by chunks, and backend anomalies owned by the
//! authoritative feed. The reconciler owns the session-wide discovered and
//! resolved ID sets (explicit state, not ambient globals) and guarantees that
//! the same logical anomaly is never handled twice across chunk reload
//! cycles or stale feed snapshots.

use ahash::AHashSet;
use tracing::{debug, warn};

use crate::anomaly::catalog::{AnomalyId, AnomalyKind};
use crate::anomaly::feed::FeedAnomaly;
use crate::chunk::cache::ChunkCache;
use crate::chunk::coord::ChunkIndex;
use crate::chunk::generator::{generate_chunk, Chunk};
use crate::core::config::WorldConfig;
use crate::core::types::Vec2;
use crate::events::{EventQueue, WorldEvent};

/// Local mirror of one unresolved backend anomaly.
///
/// The feed owns everything except `attached`, which tracks whether the
/// anomaly's containing chunk is currently loaded.
#[derive(Debug, Clone)]
pub struct BackendAnomaly {
    pub id: String,
    pub kind: AnomalyKind,
    /// Severity in [0, 1], as supplied by the feed
    pub severity: f32,
    pub position: Vec2,
    pub attached: bool,
}

/// What a successful resolution affected, for the minigame/score layer
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactRecord {
    pub id: AnomalyId,
    pub kind: AnomalyKind,
    /// Normalized severity in [0, 1]
    pub severity: f32,
    pub position: Vec2,
    /// True when the sync layer must also notify the backend service
    pub backend: bool,
}

/// Result of a resolution request.
///
/// Unknown and already-resolved IDs both yield `AlreadyResolved`: resolution
/// requests can race with a `sync_backend` that just removed the same ID, so
/// a duplicate request is a no-op, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(ImpactRecord),
    AlreadyResolved,
}

pub struct AnomalyReconciler {
    /// IDs sighted at least once this session; append-only
    discovered: AHashSet<AnomalyId>,
    /// IDs resolved (locally or feed-confirmed) this session; append-only
    /// except for explicit pruning of feed-confirmed backend IDs
    resolved: AHashSet<AnomalyId>,
    /// Live unresolved backend anomalies, in insertion order
    live: Vec<BackendAnomaly>,
    /// Unresolved IDs listed by the most recent snapshot; guards pruning
    last_snapshot_ids: AHashSet<String>,
}

impl AnomalyReconciler {
    pub fn new() -> Self {
        Self {
            discovered: AHashSet::new(),
            resolved: AHashSet::new(),
            live: Vec::new(),
            last_snapshot_ids: AHashSet::new(),
        }
    }

    pub fn discovered_ids(&self) -> &AHashSet<AnomalyId> {
        &self.discovered
    }

    pub fn resolved_ids(&self) -> &AHashSet<AnomalyId> {
        &self.resolved
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Live backend anomalies in insertion order
    pub fn live_backend(&self) -> &[BackendAnomaly] {
        &self.live
    }

    pub fn is_resolved(&self, id: &AnomalyId) -> bool {
        self.resolved.contains(id)
    }

    fn mark_discovered(&mut self, id: AnomalyId, events: &mut EventQueue) {
        if self.discovered.insert(id.clone()) {
            events.push(WorldEvent::AnomalyDiscovered { id });
        }
    }

    /// Reconcile against a fresh authoritative snapshot.
    ///
    /// This is a set-diff, not an accumulation: calling it twice with the
    /// same snapshot produces no additional events the second time. A stale
    /// snapshot that still lists a locally-resolved ID cannot resurrect it.
    pub fn sync_backend(&mut self, snapshot: &[FeedAnomaly], events: &mut EventQueue) {
        let mut active_ids: AHashSet<String> = AHashSet::new();

        for record in snapshot {
            if !record.is_well_formed() {
                warn!(id = %record.id, "ignoring malformed feed record during sync");
                continue;
            }
            if record.resolved {
                continue;
            }
            // Every unresolved listing counts as "feed still references this
            // ID", including ones resolved locally, so pruning cannot drop a
            // resolution the feed has not yet confirmed.
            active_ids.insert(record.id.clone());
            let id = AnomalyId::backend(record.id.clone());
            if self.resolved.contains(&id) {
                // Local resolution takes precedence until the feed stops
                // listing the ID.
                continue;
            }

            if let Some(existing) = self.live.iter_mut().find(|a| a.id == record.id) {
                // Read-mostly mirror: the feed stays authoritative for
                // everything except the attached flag.
                existing.kind = AnomalyKind::from_feed_tag(&record.kind_tag);
                existing.severity = record.severity;
                existing.position = record.location;
            } else {
                self.live.push(BackendAnomaly {
                    id: record.id.clone(),
                    kind: AnomalyKind::from_feed_tag(&record.kind_tag),
                    severity: record.severity,
                    position: record.location,
                    attached: false,
                });
                self.mark_discovered(id, events);
            }
        }

        // Anything live that the feed no longer lists as unresolved is done.
        let mut removed = Vec::new();
        self.live.retain(|anomaly| {
            if active_ids.contains(&anomaly.id) {
                true
            } else {
                removed.push((anomaly.id.clone(), anomaly.attached));
                false
            }
        });
        for (id, was_attached) in removed {
            let id = AnomalyId::backend(id);
            if was_attached {
                events.push(WorldEvent::AnomalyHidden { id: id.clone() });
            }
            debug!(id = %id, "feed confirmed backend anomaly gone");
            self.resolved.insert(id);
        }

        self.last_snapshot_ids = active_ids;
    }

    /// Attach or detach backend anomalies based on which chunks are loaded.
    ///
    /// Emits `AnomalyVisible` exactly once per attach and `AnomalyHidden`
    /// when an attached anomaly's chunk is evicted. Procedural anomalies need
    /// no attach step; they travel with their chunk's `ChunkLoaded` event.
    pub fn attach_visuals(
        &mut self,
        cache: &ChunkCache,
        config: &WorldConfig,
        events: &mut EventQueue,
    ) {
        for anomaly in &mut self.live {
            let chunk = ChunkIndex::containing(anomaly.position, config.chunk_size);
            let loaded = cache.contains(&chunk);
            if loaded && !anomaly.attached {
                anomaly.attached = true;
                events.push(WorldEvent::AnomalyVisible {
                    id: AnomalyId::backend(anomaly.id.clone()),
                    position: anomaly.position,
                    kind: anomaly.kind,
                    severity: anomaly.severity,
                    backend: true,
                });
            } else if !loaded && anomaly.attached {
                anomaly.attached = false;
                events.push(WorldEvent::AnomalyHidden {
                    id: AnomalyId::backend(anomaly.id.clone()),
                });
            }
        }
    }

    /// First-sighting accounting for a chunk that just loaded.
    ///
    /// Counts discovery once per ID across the whole session, so re-entering
    /// a chunk does not re-discover its anomalies.
    pub fn note_chunk_loaded(&mut self, chunk: &Chunk, events: &mut EventQueue) {
        let unresolved: Vec<AnomalyId> = chunk
            .anomalies
            .iter()
            .filter(|a| !a.resolved)
            .map(|a| a.id.clone())
            .collect();
        for id in unresolved {
            self.mark_discovered(id, events);
        }
    }

    /// Resolve an anomaly by ID.
    ///
    /// At most one call per ID has any effect. Procedural anomalies whose
    /// chunk was evicted mid-interaction are resolved against deterministic
    /// regeneration, so the impact record always carries the anomaly's real
    /// world position.
    pub fn resolve(
        &mut self,
        id: &AnomalyId,
        cache: &mut ChunkCache,
        seed: &str,
        config: &WorldConfig,
        events: &mut EventQueue,
    ) -> ResolveOutcome {
        if self.resolved.contains(id) {
            return ResolveOutcome::AlreadyResolved;
        }

        let impact = match id {
            AnomalyId::Backend(backend_id) => {
                let Some(pos) = self.live.iter().position(|a| a.id == *backend_id) else {
                    return ResolveOutcome::AlreadyResolved;
                };
                let anomaly = self.live.remove(pos);
                ImpactRecord {
                    id: id.clone(),
                    kind: anomaly.kind,
                    severity: anomaly.severity,
                    position: anomaly.position,
                    backend: true,
                }
            }
            AnomalyId::Procedural { chunk_x, chunk_y, .. } => {
                let chunk_index = ChunkIndex::new(*chunk_x, *chunk_y);
                let found = match cache.get_mut(&chunk_index) {
                    Some(chunk) => {
                        match chunk.anomalies.iter_mut().find(|a| a.id == *id) {
                            Some(anomaly) => {
                                anomaly.resolved = true;
                                Some((anomaly.kind, anomaly.severity_norm(), anomaly.position))
                            }
                            None => None,
                        }
                    }
                    // Chunk already evicted: regenerate it purely to recover
                    // the anomaly's attributes.
                    None => generate_chunk(chunk_index, seed, config, &self.resolved)
                        .anomalies
                        .iter()
                        .find(|a| a.id == *id)
                        .map(|a| (a.kind, a.severity_norm(), a.position)),
                };
                let Some((kind, severity, position)) = found else {
                    return ResolveOutcome::AlreadyResolved;
                };
                ImpactRecord { id: id.clone(), kind, severity, position, backend: false }
            }
        };

        // Resolution implies discovery, keeping resolved a subset of
        // discovered even when the caller never sighted the anomaly.
        self.mark_discovered(id.clone(), events);
        self.resolved.insert(id.clone());
        events.push(WorldEvent::AnomalyResolved { id: id.clone() });
        ResolveOutcome::Resolved(impact)
    }

    /// Drop feed-confirmed backend IDs from the resolved set.
    ///
    /// Only backend IDs absent from the most recent snapshot's unresolved
    /// set are removed: the feed has already acknowledged the resolution, so
    /// a later snapshot listing the same ID again is a genuinely new anomaly.
    /// Procedural IDs are never pruned; they are the tombstones that keep
    /// chunk re-entry consistent. Returns the number of IDs removed.
    pub fn prune_resolved(&mut self) -> usize {
        let before = self.resolved.len();
        let snapshot = &self.last_snapshot_ids;
        self.resolved.retain(|id| match id {
            AnomalyId::Procedural { .. } => true,
            AnomalyId::Backend(backend_id) => snapshot.contains(backend_id),
        });
        before - self.resolved.len()
    }
}

impl Default for AnomalyReconciler {
    fn default() -> Self {
        Self::new()
    }
}
