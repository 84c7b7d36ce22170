use std::io::Read;
use std::path::Path;

use forensim_common::entities::{CoOccurrence, SampleKey};
use forensim_common::error::Result;
use tracing::{info, warn};

use crate::columns::{self, ColumnIndex, COMMON_SUBSTANCE, SAMPLE_1, SAMPLE_2};

/// Parse a co-occurrence table. An empty substance cell becomes `None`.
pub fn read_co_occurrence<R: Read>(rdr: R) -> Result<Vec<CoOccurrence>> {
    let mut reader = columns::reader(rdr);
    let headers = reader.headers().map_err(columns::csv_error)?.clone();
    let cols = ColumnIndex::resolve(&headers, &[SAMPLE_1, SAMPLE_2, COMMON_SUBSTANCE], "co-occurrence")?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(columns::csv_error)?;
        let (a, b) = (cols.cell(&record, 0), cols.cell(&record, 1));
        if a.is_empty() || b.is_empty() {
            warn!("Skipping co-occurrence row {}: blank sample", line + 2);
            continue;
        }
        let substance = cols.cell(&record, 2);
        rows.push(CoOccurrence {
            sample_a: SampleKey::parse(a),
            sample_b: SampleKey::parse(b),
            substance: (!substance.is_empty()).then(|| substance.to_string()),
        });
    }
    Ok(rows)
}

pub fn load_co_occurrence(path: &Path) -> Result<Vec<CoOccurrence>> {
    let rows = read_co_occurrence(columns::open(path, "co-occurrence")?)?;
    info!("Loaded {} co-occurrence rows from {:?}", rows.len(), path);
    Ok(rows)
}
