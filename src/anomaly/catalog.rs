//! Anomaly kind catalog and identity
//!
//! The kind catalog is a closed enum with a static metadata table, so an
//! unknown type tag from the feed degrades to a checked fallback instead of a
//! missing lookup at runtime.

use serde::{Deserialize, Serialize};

/// Fixed catalog of anomaly kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    RiftSurge,
    IonStorm,
    DebrisField,
    SignalGhost,
    GravityWell,
}

/// Render/interaction metadata for a kind
#[derive(Debug, Clone, Copy)]
pub struct KindInfo {
    pub label: &'static str,
    /// Hue in degrees for the renderer's palette
    pub hue: f32,
    /// Visual radius in world units at severity zero
    pub base_radius: f32,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 5] = [
        AnomalyKind::RiftSurge,
        AnomalyKind::IonStorm,
        AnomalyKind::DebrisField,
        AnomalyKind::SignalGhost,
        AnomalyKind::GravityWell,
    ];

    /// Fallback used for unknown feed tags
    pub const DEFAULT: AnomalyKind = AnomalyKind::SignalGhost;

    pub fn info(self) -> &'static KindInfo {
        match self {
            AnomalyKind::RiftSurge => &KindInfo { label: "Rift Surge", hue: 285.0, base_radius: 34.0 },
            AnomalyKind::IonStorm => &KindInfo { label: "Ion Storm", hue: 200.0, base_radius: 42.0 },
            AnomalyKind::DebrisField => &KindInfo { label: "Debris Field", hue: 30.0, base_radius: 50.0 },
            AnomalyKind::SignalGhost => &KindInfo { label: "Signal Ghost", hue: 130.0, base_radius: 26.0 },
            AnomalyKind::GravityWell => &KindInfo { label: "Gravity Well", hue: 0.0, base_radius: 38.0 },
        }
    }

    /// Wire tag used by the authoritative feed
    pub fn feed_tag(self) -> &'static str {
        match self {
            AnomalyKind::RiftSurge => "rift_surge",
            AnomalyKind::IonStorm => "ion_storm",
            AnomalyKind::DebrisField => "debris_field",
            AnomalyKind::SignalGhost => "signal_ghost",
            AnomalyKind::GravityWell => "gravity_well",
        }
    }

    /// Map a feed tag to a kind, falling back to [`AnomalyKind::DEFAULT`]
    /// for tags this build does not know
    pub fn from_feed_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.feed_tag() == tag)
            .unwrap_or(Self::DEFAULT)
    }
}

/// Anomaly identity across both content sources.
///
/// Procedural IDs are deterministic from chunk and generation order; backend
/// IDs are opaque strings supplied by the feed (never containing `:` by
/// contract). The tagged union makes misclassifying an ID impossible, unlike
/// a string-contains-colon convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyId {
    Procedural { chunk_x: i32, chunk_y: i32, index: u8 },
    Backend(String),
}

impl AnomalyId {
    pub fn procedural(chunk_x: i32, chunk_y: i32, index: u8) -> Self {
        Self::Procedural { chunk_x, chunk_y, index }
    }

    pub fn backend(id: impl Into<String>) -> Self {
        Self::Backend(id.into())
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

impl std::fmt::Display for AnomalyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Procedural { chunk_x, chunk_y, index } => {
                write!(f, "{}:{}:{}", chunk_x, chunk_y, index)
            }
            Self::Backend(id) => write!(f, "{}", id),
        }
    }
}
