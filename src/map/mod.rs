//! Map-space projection for minimap and full-map consumers

pub mod projector;

pub use projector::{project_world, MapPoint, MapSnapshot, Viewport};
