pub mod alignment;
pub mod config;
pub mod constants;
pub mod error;
pub mod phase;
pub mod plot;
pub mod session;
pub mod topology;
pub mod utils;

pub use alignment::{align_phase_to_heading, AlignmentConfig};
pub use config::AnalysisConfig;
pub use error::{Result, RingphaseError};
pub use phase::{compute_phase, RingProjection};
pub use session::ImagingSession;
pub use topology::{
    correlation_distances, downsample_rows, PersistenceConfig, PersistenceDiagram,
    PersistenceEngine,
};
