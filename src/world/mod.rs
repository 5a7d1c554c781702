//! World tick orchestrator
//!
//! Ties the subsystems together: observer movement drives the chunk cache,
//! chunk changes drive discovery and backend attachment, and the resulting
//! events feed the (external) rendering and UI layers. All state has exactly
//! one writer, the tick; nothing here blocks or suspends.

use tracing::debug;

use crate::anomaly::catalog::AnomalyId;
use crate::anomaly::feed::{parse_feed, FeedAnomaly};
use crate::anomaly::interaction::{find_nearest, InteractionCandidate};
use crate::anomaly::reconciler::{AnomalyReconciler, ImpactRecord, ResolveOutcome};
use crate::chunk::cache::ChunkCache;
use crate::chunk::coord::ChunkIndex;
use crate::core::config::WorldConfig;
use crate::core::error::Result;
use crate::core::types::{Tick, Vec2};
use crate::events::{EventQueue, WorldEvent};
use crate::map::projector::{project_world, MapSnapshot, Viewport};

pub struct WorldState {
    seed: String,
    config: WorldConfig,
    cache: ChunkCache,
    reconciler: AnomalyReconciler,
    events: EventQueue,
    observer: Vec2,
    tick: Tick,
}

impl WorldState {
    pub fn new(seed: impl Into<String>, config: WorldConfig) -> Self {
        let cache = ChunkCache::new(config.active_chunk_radius);
        Self {
            seed: seed.into(),
            config,
            cache,
            reconciler: AnomalyReconciler::new(),
            events: EventQueue::new(),
            observer: Vec2::default(),
            tick: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn observer(&self) -> Vec2 {
        self.observer
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    pub fn reconciler(&self) -> &AnomalyReconciler {
        &self.reconciler
    }

    pub fn discovered_count(&self) -> usize {
        self.reconciler.discovered_count()
    }

    pub fn resolved_count(&self) -> usize {
        self.reconciler.resolved_count()
    }

    /// Advance one tick with a fresh observer position.
    ///
    /// Synchronous and atomic: when this returns, the loaded chunk set is
    /// exactly the active window around the observer's chunk, discovery has
    /// been counted for newly loaded content, and backend attachment matches
    /// the loaded set.
    pub fn update_observer(&mut self, position: Vec2) {
        self.tick += 1;
        self.observer = position;

        let center = ChunkIndex::containing(position, self.config.chunk_size);
        if self.cache.center() != Some(center) {
            debug!(chunk = %center, tick = self.tick, "recentering chunk window");
            let mark = self.events.len();
            self.cache.set_center(
                center,
                &self.seed,
                &self.config,
                self.reconciler.resolved_ids(),
                &mut self.events,
            );

            // First-sighting accounting for chunks that just loaded
            let loaded: Vec<ChunkIndex> = self.events.pending()[mark..]
                .iter()
                .filter_map(|e| match e {
                    WorldEvent::ChunkLoaded { index, .. } => Some(*index),
                    _ => None,
                })
                .collect();
            for index in loaded {
                if let Some(chunk) = self.cache.get(&index) {
                    self.reconciler.note_chunk_loaded(chunk, &mut self.events);
                }
            }

            self.reconciler
                .attach_visuals(&self.cache, &self.config, &mut self.events);
        }
    }

    /// Hand the reconciler a fresh authoritative snapshot
    pub fn apply_feed(&mut self, snapshot: &[FeedAnomaly]) {
        self.reconciler.sync_backend(snapshot, &mut self.events);
        self.reconciler
            .attach_visuals(&self.cache, &self.config, &mut self.events);
    }

    /// Parse and apply a JSON snapshot from the networking layer
    pub fn apply_feed_json(&mut self, json: &str) -> Result<()> {
        let snapshot = parse_feed(json)?;
        self.apply_feed(&snapshot);
        Ok(())
    }

    /// Nearest unresolved anomaly within interaction reach, if any
    pub fn nearest_interactable(&self) -> Option<InteractionCandidate> {
        find_nearest(self.observer, &self.cache, &self.reconciler, &self.config)
    }

    /// Resolve an anomaly by ID
    pub fn resolve(&mut self, id: &AnomalyId) -> ResolveOutcome {
        self.reconciler.resolve(
            id,
            &mut self.cache,
            &self.seed,
            &self.config,
            &mut self.events,
        )
    }

    /// Resolve whatever is nearest in reach, if anything
    pub fn resolve_nearest(&mut self) -> Option<ImpactRecord> {
        let candidate = self.nearest_interactable()?;
        match self.resolve(&candidate.id) {
            ResolveOutcome::Resolved(impact) => Some(impact),
            ResolveOutcome::AlreadyResolved => None,
        }
    }

    /// Drop feed-confirmed backend IDs from the resolved set
    pub fn prune_resolved(&mut self) -> usize {
        self.reconciler.prune_resolved()
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain()
    }

    /// Minimap snapshot centered on the observer
    pub fn minimap(&self) -> MapSnapshot {
        let viewport = Viewport::minimap(self.observer, &self.config);
        project_world(viewport, self.observer, &self.cache, &self.reconciler, &self.config)
    }

    /// Full-map snapshot sized to the loaded chunk bounds
    pub fn full_map(&self) -> MapSnapshot {
        let viewport = Viewport::full_map(&self.cache, &self.config);
        project_world(viewport, self.observer, &self.cache, &self.reconciler, &self.config)
    }
}
