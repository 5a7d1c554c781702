//! Chunk coordinates, generation, and streaming cache

pub mod cache;
pub mod coord;
pub mod generator;

pub use cache::ChunkCache;
pub use coord::ChunkIndex;
pub use generator::{generate_chunk, Chunk, ProceduralAnomaly, StaticCluster};
