use std::io::Read;
use std::path::Path;

use forensim_common::entities::{PairScore, SampleKey};
use forensim_common::error::{ForensimError, Result};
use forensim_metrics::engines::Metric;
use tracing::{info, warn};

use crate::columns::{self, ColumnIndex, SAMPLE_1, SAMPLE_2};

/// Parse a precomputed single-metric pair table. The score column is named
/// after the metric (`Jaccard`, `Euclidean` or `Cosine`).
///
/// Scores that are not finite numbers are skipped with a warning. Range
/// checks happen when the tables are merged, not here.
pub fn read_pair_table<R: Read>(rdr: R, metric: Metric) -> Result<Vec<PairScore>> {
    let mut reader = columns::reader(rdr);
    let headers = reader.headers().map_err(columns::csv_error)?.clone();
    let table = format!("{} pair", metric.column_name());
    let cols = ColumnIndex::resolve(&headers, &[SAMPLE_1, SAMPLE_2, metric.column_name()], &table)?;

    let mut rows = Vec::new();
    let mut non_numeric = 0usize;
    let mut total = 0usize;
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(columns::csv_error)?;
        total += 1;
        let (a, b, raw) = (cols.cell(&record, 0), cols.cell(&record, 1), cols.cell(&record, 2));
        if a.is_empty() || b.is_empty() {
            warn!("Skipping {} row {}: blank sample", table, line + 2);
            continue;
        }
        match raw.parse::<f64>() {
            Ok(score) if score.is_finite() => {
                rows.push(PairScore::new(SampleKey::parse(a), SampleKey::parse(b), score))
            }
            _ => {
                non_numeric += 1;
                warn!("Skipping {} row {}: score {:?} is not numeric", table, line + 2, raw);
            }
        }
    }

    if total > 0 && non_numeric == total {
        return Err(ForensimError::InvalidData(format!(
            "no numeric values in column '{}'",
            metric.column_name()
        )));
    }
    Ok(rows)
}

pub fn load_pair_table(path: &Path, metric: Metric) -> Result<Vec<PairScore>> {
    let rows = read_pair_table(columns::open(path, metric.column_name())?, metric)?;
    info!("Loaded {} {} pair scores from {:?}", rows.len(), metric.column_name(), path);
    Ok(rows)
}
