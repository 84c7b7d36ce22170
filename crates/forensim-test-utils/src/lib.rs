//! Shared fixtures for forensim tests.
//!
//! Datasets here are small enough to check by hand; `random_records` is the
//! exception and exists for invariant checks over many shapes.

use forensim_common::entities::{CoOccurrence, CompositionRecord, PairScore, SampleKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use pretty_assertions;

/// Expand dense rows into composition records, zeros included.
pub fn records_from_rows(substances: &[&str], rows: &[(&str, &[f64])]) -> Vec<CompositionRecord> {
    rows.iter()
        .flat_map(|(sample, values)| {
            assert_eq!(values.len(), substances.len(), "row {sample} has wrong width");
            substances
                .iter()
                .zip(values.iter())
                .map(move |(sub, v)| CompositionRecord::new(*sample, *sub, *v))
        })
        .collect()
}

/// Two identical street samples (X, Y) and one unrelated sample (Z).
pub fn xyz_records() -> Vec<CompositionRecord> {
    vec![
        CompositionRecord::new("X", "Heroin", 60.0),
        CompositionRecord::new("X", "Caffeine", 40.0),
        CompositionRecord::new("Y", "Heroin", 60.0),
        CompositionRecord::new("Y", "Caffeine", 40.0),
        CompositionRecord::new("Z", "Cocaine", 70.0),
        CompositionRecord::new("Z", "Lidocaine", 30.0),
    ]
}

/// Four samples with partial overlap, used for filter and ordering tests.
///
/// | sample | Heroin | Caffeine | Paracetamol | Cocaine |
/// |--------|--------|----------|-------------|---------|
/// | A      | 50     | 30       | 20          | 0       |
/// | B      | 45     | 35       | 20          | 0       |
/// | C      | 50     | 0        | 50          | 0       |
/// | D      | 0      | 10       | 0           | 90      |
pub fn four_sample_records() -> Vec<CompositionRecord> {
    records_from_rows(
        &["Heroin", "Caffeine", "Paracetamol", "Cocaine"],
        &[
            ("A", &[50.0, 30.0, 20.0, 0.0]),
            ("B", &[45.0, 35.0, 20.0, 0.0]),
            ("C", &[50.0, 0.0, 50.0, 0.0]),
            ("D", &[0.0, 10.0, 0.0, 90.0]),
        ],
    )
}

/// Co-occurrence rows matching `four_sample_records`, in mixed orientation
/// and with a duplicate and an empty cell as found in exported tables.
pub fn four_sample_co_occurrence() -> Vec<CoOccurrence> {
    vec![
        CoOccurrence::new("A", "B", "Heroin"),
        CoOccurrence::new("A", "B", "Caffeine"),
        CoOccurrence::new("B", "A", "Paracetamol"),
        CoOccurrence::new("A", "B", "Heroin"),
        CoOccurrence::new("A", "C", "Paracetamol"),
        CoOccurrence::new("C", "A", "Heroin"),
        CoOccurrence::new("B", "C", "Heroin"),
        CoOccurrence::new("B", "C", "Paracetamol"),
        CoOccurrence::new("A", "D", "Caffeine"),
        CoOccurrence::new("B", "D", "Caffeine"),
        CoOccurrence {
            sample_a: SampleKey::from("C"),
            sample_b: SampleKey::from("D"),
            substance: None,
        },
    ]
}

/// Precomputed single-metric pair table over the given ordered pairs.
pub fn pair_table(rows: &[(&str, &str, f64)]) -> Vec<PairScore> {
    rows.iter().map(|(a, b, s)| PairScore::new(*a, *b, *s)).collect()
}

/// Random sparse composition data; the same seed yields the same records.
pub fn random_records(seed: u64, n_samples: usize, n_substances: usize) -> Vec<CompositionRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();
    for s in 0..n_samples {
        for sub in 0..n_substances {
            if rng.gen_bool(0.4) {
                let area: f64 = rng.gen_range(0.0..100.0);
                records.push(CompositionRecord::new(s as i64, format!("substance-{sub}"), area));
            }
        }
        // Guarantee every sample appears at least once, possibly as all-zero.
        records.push(CompositionRecord::new(s as i64, "substance-0", 0.0));
    }
    records
}

/// Composition CSV in the dashboard's column layout.
pub const COMPOSITION_CSV: &str = "\
Sample number,Substance,Relative area (%),Category
1,Heroin,60.5,Opioid
1,Caffeine,39.5,Adulterant
2,Heroin,58.0,Opioid
2,Caffeine,42.0,Adulterant
3,Cocaine,80.0,Stimulant
3,Lidocaine,20.0,Adulterant
";

/// Co-occurrence CSV matching `COMPOSITION_CSV`.
pub const CO_OCCURRENCE_CSV: &str = "\
Sample_1,Sample_2,Common_Substance
1,2,Heroin
1,2,Caffeine
2,1,Heroin
";
