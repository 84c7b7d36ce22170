//! Header lookup shared by the table readers.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, Trim};
use forensim_common::error::{ForensimError, Result};

pub const SAMPLE_NUMBER: &str = "Sample number";
pub const SUBSTANCE: &str = "Substance";
pub const RELATIVE_AREA: &str = "Relative area (%)";
pub const SAMPLE_1: &str = "Sample_1";
pub const SAMPLE_2: &str = "Sample_2";
pub const COMMON_SUBSTANCE: &str = "Common_Substance";

pub(crate) fn csv_error(err: csv::Error) -> ForensimError {
    ForensimError::Csv(err.to_string())
}

pub(crate) fn reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

pub(crate) fn open(path: &Path, table: &str) -> Result<File> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {table} table: {:?}", path))?;
    Ok(file)
}

/// Positions of required columns in a header row.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: Vec<usize>,
}

impl ColumnIndex {
    /// Locate every `required` column or fail naming the missing ones.
    pub fn resolve(headers: &StringRecord, required: &[&str], table: &str) -> Result<Self> {
        let mut positions = Vec::with_capacity(required.len());
        let mut missing = Vec::new();
        for name in required {
            match headers.iter().position(|h| h.trim() == *name) {
                Some(i) => positions.push(i),
                None => missing.push(*name),
            }
        }
        if !missing.is_empty() {
            return Err(ForensimError::InvalidData(format!(
                "{table} table is missing required column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self { positions })
    }

    /// Cell for the `n`-th required column; a short row reads as empty.
    pub fn cell<'r>(&self, record: &'r StringRecord, n: usize) -> &'r str {
        self.positions
            .get(n)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}
