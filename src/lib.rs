//! Drift Survey - chunked procedural star-field world core

pub mod anomaly;
pub mod chunk;
pub mod core;
pub mod events;
pub mod map;
pub mod rng;
pub mod world;
