//! World configuration with documented constants
//!
//! All tuning values for chunk streaming and anomaly population are collected
//! here with explanations of their purpose and how they interact.

use serde::{Deserialize, Serialize};

/// Configuration for chunk streaming and procedural content
///
/// These values are fixed for a play session; all procedural determinism
/// assumes they do not change while chunks are being generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === CHUNK STREAMING ===
    /// Side length of a chunk in world units
    ///
    /// Chunk indices are `floor(world / chunk_size)`, so changing this
    /// remaps every piece of generated content.
    pub chunk_size: f32,

    /// Chebyshev radius of the loaded-chunk square around the observer
    ///
    /// The cache holds exactly `(2 * radius + 1)^2` chunks after any
    /// recenter. At radius 2 that is a 5x5 window.
    pub active_chunk_radius: i32,

    // === STAR CLUSTERS ===
    /// Minimum star clusters per chunk (inclusive)
    pub cluster_count_min: u32,

    /// Maximum star clusters per chunk (inclusive)
    pub cluster_count_max: u32,

    /// Cluster visual radius range in world units, [min, max)
    pub cluster_radius_min: f32,
    pub cluster_radius_max: f32,

    // === PROCEDURAL ANOMALIES ===
    /// Probability that a chunk contains any anomalies at all
    pub anomaly_spawn_chance: f32,

    /// Maximum anomalies in a chunk that spawns any (count is 1..=this)
    pub anomalies_per_chunk: u32,

    // === INTERACTION ===
    /// Base interaction reach in world units
    ///
    /// The effective range for a given anomaly is this base plus the
    /// anomaly's visual radius, so large anomalies are reachable sooner.
    pub interaction_range_base: f32,

    // === MAP ===
    /// Half-width of the minimap window in world units
    pub minimap_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000.0,
            active_chunk_radius: 2,

            cluster_count_min: 8,
            cluster_count_max: 19,
            cluster_radius_min: 4.0,
            cluster_radius_max: 26.0,

            anomaly_spawn_chance: 0.3,
            anomalies_per_chunk: 3,

            interaction_range_base: 60.0,

            minimap_radius: 1500.0,
        }
    }
}

impl WorldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text, then validate it
    pub fn from_toml_str(text: &str) -> crate::core::error::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config
            .validate()
            .map_err(crate::core::error::SurveyError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(format!("chunk_size ({}) must be positive", self.chunk_size));
        }

        if self.active_chunk_radius < 0 {
            return Err(format!(
                "active_chunk_radius ({}) must be non-negative",
                self.active_chunk_radius
            ));
        }

        if self.cluster_count_min > self.cluster_count_max {
            return Err(format!(
                "cluster_count_min ({}) must be <= cluster_count_max ({})",
                self.cluster_count_min, self.cluster_count_max
            ));
        }

        if self.cluster_radius_min >= self.cluster_radius_max {
            return Err(format!(
                "cluster_radius_min ({}) must be < cluster_radius_max ({})",
                self.cluster_radius_min, self.cluster_radius_max
            ));
        }

        if !(0.0..=1.0).contains(&self.anomaly_spawn_chance) {
            return Err(format!(
                "anomaly_spawn_chance ({}) must be in [0, 1]",
                self.anomaly_spawn_chance
            ));
        }

        if self.anomalies_per_chunk == 0 {
            return Err("anomalies_per_chunk must be at least 1".into());
        }

        // Procedural IDs carry the in-chunk index as a u8
        if self.anomalies_per_chunk > 256 {
            return Err(format!(
                "anomalies_per_chunk ({}) must be <= 256",
                self.anomalies_per_chunk
            ));
        }

        if self.interaction_range_base <= 0.0 || self.minimap_radius <= 0.0 {
            return Err("interaction_range_base and minimap_radius must be positive".into());
        }

        Ok(())
    }
}
