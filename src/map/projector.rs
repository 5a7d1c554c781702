//! World-space to map-space projection
//!
//! Pure functions: callers rebuild snapshots every tick from fresh inputs.
//! Normalized coordinates run 0..1 across the viewport on both axes, with an
//! explicit in-view flag instead of clipping, so consumers decide how to
//! treat off-map entities.

use serde::{Deserialize, Serialize};

use crate::anomaly::catalog::{AnomalyId, AnomalyKind};
use crate::anomaly::reconciler::AnomalyReconciler;
use crate::chunk::cache::ChunkCache;
use crate::chunk::coord::ChunkIndex;
use crate::core::config::WorldConfig;
use crate::core::types::Vec2;

/// A world-space window that positions are normalized against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl Viewport {
    /// Fixed square minimap window centered on the observer
    pub fn minimap(observer: Vec2, config: &WorldConfig) -> Self {
        Self {
            center: observer,
            half_extent: Vec2::new(config.minimap_radius, config.minimap_radius),
        }
    }

    /// Full-map window sized to the loaded chunk bounds.
    ///
    /// Per-axis extents are clamped up to the larger one so the map keeps a
    /// square aspect ratio instead of stretching either axis.
    pub fn full_map(cache: &ChunkCache, config: &WorldConfig) -> Self {
        let chunks = cache.loaded_sorted();
        let Some(first) = chunks.first() else {
            // Nothing loaded yet; a single-chunk window around the origin
            return Self {
                center: Vec2::new(config.chunk_size * 0.5, config.chunk_size * 0.5),
                half_extent: Vec2::new(config.chunk_size * 0.5, config.chunk_size * 0.5),
            };
        };

        let mut min = first.index;
        let mut max = first.index;
        for chunk in &chunks {
            min.x = min.x.min(chunk.index.x);
            min.y = min.y.min(chunk.index.y);
            max.x = max.x.max(chunk.index.x);
            max.y = max.y.max(chunk.index.y);
        }

        let lo = min.origin(config.chunk_size);
        let hi = ChunkIndex::new(max.x + 1, max.y + 1).origin(config.chunk_size);
        let half = (hi - lo) * 0.5;
        let clamped = half.x.max(half.y);
        Self {
            center: lo + half,
            half_extent: Vec2::new(clamped, clamped),
        }
    }

    /// Normalize a world position into this viewport
    pub fn project(&self, pos: Vec2) -> MapPoint {
        let nx = (pos.x - (self.center.x - self.half_extent.x)) / (self.half_extent.x * 2.0);
        let ny = (pos.y - (self.center.y - self.half_extent.y)) / (self.half_extent.y * 2.0);
        MapPoint {
            normalized: Vec2::new(nx, ny),
            in_view: (0.0..=1.0).contains(&nx) && (0.0..=1.0).contains(&ny),
        }
    }
}

/// A projected entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// 0..1 across the viewport on both axes (may fall outside when not in view)
    pub normalized: Vec2,
    pub in_view: bool,
}

/// A projected anomaly marker
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyMark {
    pub id: AnomalyId,
    pub kind: AnomalyKind,
    pub backend: bool,
    pub point: MapPoint,
}

/// A projected star cluster marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterMark {
    pub hue: f32,
    pub point: MapPoint,
}

/// Everything a map consumer draws in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    pub viewport: Viewport,
    pub player: MapPoint,
    pub clusters: Vec<ClusterMark>,
    pub anomalies: Vec<AnomalyMark>,
    /// Loaded chunk centers, for grid overlays
    pub chunks: Vec<(ChunkIndex, MapPoint)>,
}

/// Project the current world state into the given viewport.
///
/// Only unresolved procedural anomalies and attached backend anomalies are
/// included; resolved tombstones never reach the map.
pub fn project_world(
    viewport: Viewport,
    observer: Vec2,
    cache: &ChunkCache,
    reconciler: &AnomalyReconciler,
    config: &WorldConfig,
) -> MapSnapshot {
    let mut clusters = Vec::new();
    let mut anomalies = Vec::new();
    let mut chunks = Vec::new();

    for chunk in cache.loaded_sorted() {
        chunks.push((chunk.index, viewport.project(chunk.index.center(config.chunk_size))));
        for cluster in &chunk.clusters {
            clusters.push(ClusterMark {
                hue: cluster.hue,
                point: viewport.project(cluster.position),
            });
        }
        for anomaly in &chunk.anomalies {
            if anomaly.resolved || reconciler.is_resolved(&anomaly.id) {
                continue;
            }
            anomalies.push(AnomalyMark {
                id: anomaly.id.clone(),
                kind: anomaly.kind,
                backend: false,
                point: viewport.project(anomaly.position),
            });
        }
    }

    for anomaly in reconciler.live_backend().iter().filter(|a| a.attached) {
        anomalies.push(AnomalyMark {
            id: AnomalyId::backend(anomaly.id.clone()),
            kind: anomaly.kind,
            backend: true,
            point: viewport.project(anomaly.position),
        });
    }

    MapSnapshot {
        viewport,
        player: viewport.project(observer),
        clusters,
        anomalies,
        chunks,
    }
}
