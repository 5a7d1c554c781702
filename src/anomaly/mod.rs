//! Anomaly catalog, feed contract, reconciliation, and interaction

pub mod catalog;
pub mod feed;
pub mod interaction;
pub mod reconciler;

pub use catalog::{AnomalyId, AnomalyKind};
pub use feed::{parse_feed, FeedAnomaly};
pub use interaction::{find_nearest, InteractionCandidate};
pub use reconciler::{AnomalyReconciler, BackendAnomaly, ImpactRecord, ResolveOutcome};
