//! Build a ready-to-query [`Dataset`] from the configured files.

use std::time::Instant;

use forensim_common::config::DataConfig;
use forensim_common::error::Result;
use forensim_metrics::engines::Metric;
use forensim_metrics::matrix::CompositionMatrix;
use forensim_network::{derive_co_occurrence, Dataset};
use tracing::info;

use crate::co_occurrence::load_co_occurrence;
use crate::composition::load_composition;
use crate::pair_table::load_pair_table;

/// Load every table named in `config` and precompute the metric scores.
///
/// Precomputed pair tables take precedence over the composition table. A
/// co-occurrence table, when configured, supplies the annotations;
/// otherwise they are derived from the composition matrix if
/// `derive_annotations` is set, and left empty if not.
pub fn load_dataset(config: &DataConfig) -> Result<Dataset> {
    let started = Instant::now();
    let co_occurrence = config
        .co_occurrence_path
        .as_deref()
        .map(load_co_occurrence)
        .transpose()?;

    let dataset = if let Some(tables) = &config.pair_tables {
        info!("Using precomputed pair tables");
        let jaccard = load_pair_table(&tables.jaccard, Metric::Jaccard)?;
        let euclidean = load_pair_table(&tables.euclidean, Metric::Euclidean)?;
        let cosine = load_pair_table(&tables.cosine, Metric::Cosine)?;
        Dataset::from_pair_tables(&jaccard, &euclidean, &cosine, co_occurrence.as_deref())?
    } else {
        let records = load_composition(&config.composition_path)?;
        let matrix = CompositionMatrix::from_records(&records, config.aggregation)?;
        match co_occurrence {
            Some(rows) => Dataset::from_matrix(&matrix, Some(rows.as_slice())),
            None if config.derive_annotations => {
                let derived = derive_co_occurrence(&matrix);
                info!("Derived {} co-occurrence rows from the composition matrix", derived.len());
                Dataset::from_matrix(&matrix, Some(derived.as_slice()))
            }
            None => Dataset::from_matrix(&matrix, None),
        }
    };

    info!("Dataset loaded in {:?}", started.elapsed());
    Ok(dataset)
}
