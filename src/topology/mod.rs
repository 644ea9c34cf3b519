//! Topological summaries of the fluorescence point cloud.
//!
//! Time samples become points in region-space; their pairwise correlation
//! distances feed a Vietoris-Rips filtration whose persistence diagram
//! summarizes the cloud's shape before and after the stimulus.

pub mod distance;
pub mod persistence;

pub use distance::{correlation_distances, downsample_rows};
pub use persistence::{PersistenceConfig, PersistenceDiagram, PersistenceEngine};
