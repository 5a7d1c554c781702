//! Loaded-chunk cache
//!
//! Keeps exactly the chunks within the active Chebyshev radius of the
//! observer's chunk. Recentering is synchronous: when `set_center` returns,
//! the cache holds the full desired square and nothing else.

use ahash::{AHashMap, AHashSet};

use crate::anomaly::catalog::AnomalyId;
use crate::chunk::coord::ChunkIndex;
use crate::chunk::generator::{generate_chunk, Chunk};
use crate::core::config::WorldConfig;
use crate::events::{EventQueue, WorldEvent};

pub struct ChunkCache {
    chunks: AHashMap<ChunkIndex, Chunk>,
    center: Option<ChunkIndex>,
    radius: i32,
}

impl ChunkCache {
    pub fn new(radius: i32) -> Self {
        Self {
            chunks: AHashMap::new(),
            center: None,
            radius,
        }
    }

    pub fn center(&self) -> Option<ChunkIndex> {
        self.center
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, index: &ChunkIndex) -> bool {
        self.chunks.contains_key(index)
    }

    pub fn get(&self, index: &ChunkIndex) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn get_mut(&mut self, index: &ChunkIndex) -> Option<&mut Chunk> {
        self.chunks.get_mut(index)
    }

    pub fn loaded(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Loaded chunks in sorted index order, for deterministic scans
    pub fn loaded_sorted(&self) -> Vec<&Chunk> {
        let mut chunks: Vec<&Chunk> = self.chunks.values().collect();
        chunks.sort_by_key(|c| c.index);
        chunks
    }

    /// Recenter the cache, generating entering chunks and evicting exiting
    /// ones. Emits `ChunkLoaded` for each generated chunk and `ChunkEvicted`
    /// for each removed one.
    pub fn set_center(
        &mut self,
        new_center: ChunkIndex,
        seed: &str,
        config: &WorldConfig,
        resolved_ids: &AHashSet<AnomalyId>,
        events: &mut EventQueue,
    ) {
        let mut desired = Vec::with_capacity(((2 * self.radius + 1).pow(2)) as usize);
        for dy in -self.radius..=self.radius {
            for dx in -self.radius..=self.radius {
                desired.push(ChunkIndex::new(new_center.x + dx, new_center.y + dy));
            }
        }

        for &index in &desired {
            if !self.chunks.contains_key(&index) {
                let chunk = generate_chunk(index, seed, config, resolved_ids);
                events.push(WorldEvent::ChunkLoaded {
                    index,
                    clusters: chunk.clusters.clone(),
                    anomalies: chunk.anomalies.clone(),
                });
                self.chunks.insert(index, chunk);
            }
        }

        let evicted: Vec<ChunkIndex> = self
            .chunks
            .keys()
            .filter(|index| index.chebyshev(&new_center) > self.radius)
            .copied()
            .collect();
        for index in evicted {
            self.chunks.remove(&index);
            events.push(WorldEvent::ChunkEvicted { index });
        }

        self.center = Some(new_center);
    }
}
