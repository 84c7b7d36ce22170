//! Edge-list CSV contract: exactly `Sample_1, Sample_2, Joint_Similarity,
//! Key_Substances`, in edge-list order.

use std::io::Write;

use forensim_common::error::{ForensimError, Result};

use crate::edges::Edge;

/// Write the edge list as CSV to any writer.
pub fn write_edges_csv<W: Write>(edges: &[Edge], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    // Header written explicitly so an empty list still has its columns.
    wtr.write_record(["Sample_1", "Sample_2", "Joint_Similarity", "Key_Substances"])
        .map_err(|err| ForensimError::Csv(err.to_string()))?;
    for e in edges {
        wtr.write_record([
            e.sample_a.to_string(),
            e.sample_b.to_string(),
            e.score.to_string(),
            e.shared_substances.clone(),
        ])
        .map_err(|err| ForensimError::Csv(err.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn edges_to_csv_string(edges: &[Edge]) -> Result<String> {
    let mut buf = Vec::new();
    write_edges_csv(edges, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ForensimError::Csv(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forensim_common::entities::SampleKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_four_columns_in_order() {
        let edges = vec![
            Edge {
                sample_a: SampleKey::from(1),
                sample_b: SampleKey::from(2),
                score: 0.75,
                shared_substances: "Caffeine, Heroin".into(),
            },
            Edge {
                sample_a: SampleKey::from(1),
                sample_b: SampleKey::from(3),
                score: 0.5,
                shared_substances: String::new(),
            },
        ];
        let csv = edges_to_csv_string(&edges).unwrap();
        assert_eq!(
            csv,
            "Sample_1,Sample_2,Joint_Similarity,Key_Substances\n1,2,0.75,\"Caffeine, Heroin\"\n1,3,0.5,\n"
        );
    }

    #[test]
    fn test_empty_list_keeps_header() {
        let csv = edges_to_csv_string(&[]).unwrap();
        assert_eq!(csv, "Sample_1,Sample_2,Joint_Similarity,Key_Substances\n");
    }
}
