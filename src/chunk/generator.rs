//! Deterministic chunk content generation
//!
//! Generation draws from a sequence keyed by `"{seed}:{chunk_key}"` in a
//! fixed order (cluster count, then per-cluster attributes, then the anomaly
//! roll), so content in a chunk never depends on visit order or on what any
//! other chunk produced. Regenerating a chunk with the same seed is
//! byte-for-byte identical, which is what makes eviction a pure memory
//! reclamation step.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::anomaly::catalog::{AnomalyId, AnomalyKind};
use crate::chunk::coord::ChunkIndex;
use crate::core::config::WorldConfig;
use crate::core::types::Vec2;
use crate::rng::SeededSequence;

/// A static star cluster, owned by its chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCluster {
    pub position: Vec2,
    pub radius: f32,
    /// Hue in degrees for the renderer's palette
    pub hue: f32,
}

/// A locally generated anomaly, owned by its chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralAnomaly {
    pub id: AnomalyId,
    pub kind: AnomalyKind,
    /// Severity tier in 1..=3
    pub severity: u8,
    pub position: Vec2,
    /// Resolved anomalies stay in the chunk as tombstones; they are skipped
    /// for interaction and hidden from the map
    pub resolved: bool,
}

impl ProceduralAnomaly {
    /// Severity mapped onto the same [0, 1] scale the feed uses
    pub fn severity_norm(&self) -> f32 {
        self.severity as f32 / 3.0
    }
}

/// A generated chunk and the content it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: ChunkIndex,
    pub clusters: Vec<StaticCluster>,
    pub anomalies: Vec<ProceduralAnomaly>,
}

/// Generate the content of one chunk.
///
/// Pure: output depends only on `index`, `seed`, `config`, and which of the
/// chunk's own anomaly IDs appear in `resolved_ids`. Never fails for any
/// integer index.
pub fn generate_chunk(
    index: ChunkIndex,
    seed: &str,
    config: &WorldConfig,
    resolved_ids: &AHashSet<AnomalyId>,
) -> Chunk {
    let mut seq = SeededSequence::from_key(&format!("{}:{}", seed, index.key()));
    let origin = index.origin(config.chunk_size);

    let cluster_count = seq.next_int(config.cluster_count_min, config.cluster_count_max);
    let mut clusters = Vec::with_capacity(cluster_count as usize);
    for _ in 0..cluster_count {
        let position = Vec2::new(
            origin.x + seq.next() * config.chunk_size,
            origin.y + seq.next() * config.chunk_size,
        );
        let radius = seq.next_range(config.cluster_radius_min, config.cluster_radius_max);
        let hue = seq.next_range(0.0, 360.0);
        clusters.push(StaticCluster { position, radius, hue });
    }

    let mut anomalies = Vec::new();
    if seq.next_bool(config.anomaly_spawn_chance) {
        let count = seq.next_int(1, config.anomalies_per_chunk);
        for local_index in 0..count {
            let kind = *seq
                .pick(&AnomalyKind::ALL)
                .unwrap_or(&AnomalyKind::DEFAULT);
            let severity = seq.next_int(1, 3) as u8;
            let position = Vec2::new(
                origin.x + seq.next() * config.chunk_size,
                origin.y + seq.next() * config.chunk_size,
            );
            let id = AnomalyId::procedural(index.x, index.y, local_index as u8);

            // Previously resolved anomalies are still generated so the draw
            // sequence for their siblings stays in sync; they just come back
            // as tombstones.
            let resolved = resolved_ids.contains(&id);

            anomalies.push(ProceduralAnomaly { id, kind, severity, position, resolved });
        }
    }

    Chunk { index, clusters, anomalies }
}
