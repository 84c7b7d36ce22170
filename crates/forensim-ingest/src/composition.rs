use std::io::Read;
use std::path::Path;

use forensim_common::entities::{CompositionRecord, SampleKey};
use forensim_common::error::{ForensimError, Result};
use tracing::{debug, info, warn};

use crate::columns::{self, ColumnIndex, RELATIVE_AREA, SAMPLE_NUMBER, SUBSTANCE};

/// Parse composition records from CSV.
///
/// Rows with a blank sample or substance, or a relative area that is not a
/// finite number (`NaN` and `inf` included), are skipped with a warning. If
/// every data row had an unusable area the table is rejected.
pub fn read_composition<R: Read>(rdr: R) -> Result<Vec<CompositionRecord>> {
    let mut reader = columns::reader(rdr);
    let headers = reader.headers().map_err(columns::csv_error)?.clone();
    let cols = ColumnIndex::resolve(&headers, &[SAMPLE_NUMBER, SUBSTANCE, RELATIVE_AREA], "composition")?;

    let mut records = Vec::new();
    let mut rows = 0usize;
    let mut non_numeric = 0usize;

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(columns::csv_error)?;
        rows += 1;

        let sample = cols.cell(&record, 0);
        let substance = cols.cell(&record, 1);
        let area = cols.cell(&record, 2);

        if sample.is_empty() || substance.is_empty() {
            warn!("Skipping composition row {}: blank sample or substance", line + 2);
            continue;
        }
        let relative_area = match area.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                non_numeric += 1;
                warn!("Skipping composition row {}: relative area {:?} is not numeric", line + 2, area);
                continue;
            }
        };
        records.push(CompositionRecord::new(SampleKey::parse(sample), substance, relative_area));
    }

    if rows > 0 && non_numeric == rows {
        return Err(ForensimError::InvalidData(format!(
            "no numeric values in column '{RELATIVE_AREA}'"
        )));
    }

    debug!("Parsed {} composition records from {} rows", records.len(), rows);
    Ok(records)
}

/// Load composition records from a CSV file.
pub fn load_composition(path: &Path) -> Result<Vec<CompositionRecord>> {
    debug!("Loading composition records from {:?}", path);
    let records = read_composition(columns::open(path, "composition")?)?;
    info!("Loaded {} composition records from {:?}", records.len(), path);
    Ok(records)
}
