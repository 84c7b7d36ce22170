//! forensim-ingest: CSV loaders for the input tables.
//!
//! Three table shapes are understood:
//!
//! | Table | Required columns |
//! |-------|------------------|
//! | composition | `Sample number`, `Substance`, `Relative area (%)` |
//! | co-occurrence | `Sample_1`, `Sample_2`, `Common_Substance` |
//! | pair table | `Sample_1`, `Sample_2`, `Jaccard` / `Euclidean` / `Cosine` |
//!
//! Extra columns are ignored. Header names are matched after trimming.
//!
//! # Example
//!
//! ```rust,no_run
//! use forensim_common::config::DataConfig;
//! use forensim_ingest::load_dataset;
//!
//! fn main() -> forensim_common::Result<()> {
//!     let dataset = load_dataset(&DataConfig::default())?;
//!     println!("{} samples", dataset.samples().len());
//!     Ok(())
//! }
//! ```

pub mod columns;
pub mod composition;
pub mod co_occurrence;
pub mod pair_table;
pub mod dataset;

pub use composition::{load_composition, read_composition};
pub use co_occurrence::{load_co_occurrence, read_co_occurrence};
pub use pair_table::{load_pair_table, read_pair_table};
pub use dataset::load_dataset;
