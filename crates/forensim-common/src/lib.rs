//! forensim-common: Shared types, errors, and configuration used across all forensim crates.

pub mod error;
pub mod entities;
pub mod config;

// Re-export commonly used types
pub use error::{ForensimError, Result};
pub use entities::{CoOccurrence, CompositionRecord, PairScore, SampleKey};
pub use config::{Aggregation, AnalysisConfig, DataConfig, FusionMode, ServerConfig, SimilarityDefaults, WeightScale};
