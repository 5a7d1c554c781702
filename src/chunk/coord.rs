//! Chunk index arithmetic
//!
//! Converts continuous world positions to discrete chunk coordinates. The
//! string key form `"{x}:{y}"` is collision-free for all integer pairs since
//! `:` never appears in a formatted integer.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Discrete chunk coordinate (signed, unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkIndex {
    pub x: i32,
    pub y: i32,
}

impl ChunkIndex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the given world position
    pub fn containing(pos: Vec2, chunk_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_size).floor() as i32,
            y: (pos.y / chunk_size).floor() as i32,
        }
    }

    /// String key for map/event consumers
    pub fn key(&self) -> String {
        format!("{}:{}", self.x, self.y)
    }

    /// Chebyshev (chessboard) distance to another chunk
    pub fn chebyshev(&self, other: &ChunkIndex) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// World-space position of this chunk's minimum corner
    pub fn origin(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }

    /// World-space center of this chunk
    pub fn center(&self, chunk_size: f32) -> Vec2 {
        let origin = self.origin(chunk_size);
        Vec2::new(origin.x + chunk_size * 0.5, origin.y + chunk_size * 0.5)
    }
}

impl std::fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}
