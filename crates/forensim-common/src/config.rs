//! Analysis configuration.
//!
//! Loaded from YAML/JSON (see `forensim.example.yaml`) or built in code.
//! Every field has a default so a partial file is enough.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ForensimError, Result};

/// Environment variable pointing at the YAML config file.
pub const CONFIG_ENV_VAR: &str = "FORENSIM_CONFIG";

/// Complete configuration of an analysis host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Input tables
    #[serde(default)]
    pub data: DataConfig,

    /// Parameter defaults used when a request leaves them out
    #[serde(default)]
    pub similarity: SimilarityDefaults,

    /// HTTP host options
    #[serde(default)]
    pub server: ServerConfig,
}

// ── Enumerated options ───────────────────────────────────────────────────────

/// How duplicate (sample, substance) records are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Relative areas are additive measurements.
    #[default]
    Sum,
    Mean,
    /// Last record in input order wins.
    Last,
}

/// Unit of user-supplied weights and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScale {
    /// 0–100, as entered on the dashboard sliders.
    #[default]
    Percent,
    /// 0–1.
    Fraction,
}

impl WeightScale {
    /// Largest admissible weight or threshold on this scale.
    pub fn max(self) -> f64 {
        match self {
            WeightScale::Percent => 100.0,
            WeightScale::Fraction => 1.0,
        }
    }
}

/// How the three metric scores are combined into the joint score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMode {
    /// Weighted arithmetic mean.
    #[default]
    Arithmetic,
    /// Weighted geometric mean; equal weights give the cube-root joint score.
    Geometric,
}

impl std::str::FromStr for FusionMode {
    type Err = ForensimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arithmetic" | "linear" | "weighted" => Ok(FusionMode::Arithmetic),
            "geometric" | "cube_root" | "joint" => Ok(FusionMode::Geometric),
            other => Err(ForensimError::Config(format!("unknown fusion mode '{other}'"))),
        }
    }
}

// ── Data ──────────────────────────────────────────────────────────────────────

/// Locations of the input tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Composition records CSV (`Sample number`, `Substance`, `Relative area (%)`)
    #[serde(default = "default_composition_path")]
    pub composition_path: PathBuf,

    /// Optional co-occurrence CSV (`Sample_1`, `Sample_2`, `Common_Substance`)
    #[serde(default)]
    pub co_occurrence_path: Option<PathBuf>,

    /// Optional precomputed per-metric pair tables; when set they replace
    /// the matrix computation.
    #[serde(default)]
    pub pair_tables: Option<PairTablePaths>,

    /// Derive shared-substance annotations from the composition matrix
    /// when no co-occurrence table is configured.
    #[serde(default = "default_true")]
    pub derive_annotations: bool,

    /// Duplicate record handling
    #[serde(default)]
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairTablePaths {
    pub jaccard: PathBuf,
    pub euclidean: PathBuf,
    pub cosine: PathBuf,
}

fn default_composition_path() -> PathBuf { PathBuf::from("data/Sample_Categorized_Data.csv") }
fn default_true() -> bool { true }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            composition_path: default_composition_path(),
            co_occurrence_path: None,
            pair_tables: None,
            derive_annotations: true,
            aggregation: Aggregation::default(),
        }
    }
}

// ── Similarity defaults ───────────────────────────────────────────────────────

/// Default request parameters, in `scale` units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityDefaults {
    #[serde(default = "default_jaccard_weight")]
    pub jaccard: f64,

    #[serde(default = "default_euclidean_weight")]
    pub euclidean: f64,

    #[serde(default = "default_cosine_weight")]
    pub cosine: f64,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub scale: WeightScale,

    #[serde(default)]
    pub fusion: FusionMode,
}

fn default_jaccard_weight() -> f64 { 33.0 }
fn default_euclidean_weight() -> f64 { 33.0 }
fn default_cosine_weight() -> f64 { 34.0 }
fn default_threshold() -> f64 { 50.0 }

impl Default for SimilarityDefaults {
    fn default() -> Self {
        Self {
            jaccard: default_jaccard_weight(),
            euclidean: default_euclidean_weight(),
            cosine: default_cosine_weight(),
            threshold: default_threshold(),
            scale: WeightScale::default(),
            fusion: FusionMode::default(),
        }
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host; defaults to 0.0.0.0 inside Docker, 127.0.0.1 otherwise
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of parameter tuples whose results are memoised
    #[serde(default = "default_memo_capacity")]
    pub memo_capacity: usize,
}

fn default_port() -> u16 { 8050 }
fn default_memo_capacity() -> usize { 64 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            memo_capacity: default_memo_capacity(),
        }
    }
}

impl ServerConfig {
    pub fn bind_host(&self) -> String {
        match &self.host {
            Some(h) => h.clone(),
            None if is_docker() => "0.0.0.0".to_string(),
            None => "127.0.0.1".to_string(),
        }
    }
}

/// Whether the process runs inside a Docker container.
pub fn is_docker() -> bool {
    Path::new("/.dockerenv").exists()
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl AnalysisConfig {
    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `$FORENSIM_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                Self::from_yaml(path)
            }
            Err(_) => {
                tracing::info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Structural checks only; parameter ranges are checked per request.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ForensimError::Config("server.port must be non-zero".into()));
        }
        if self.server.memo_capacity == 0 {
            return Err(ForensimError::Config("server.memo_capacity must be at least 1".into()));
        }
        if self.data.composition_path.as_os_str().is_empty() && self.data.pair_tables.is_none() {
            return Err(ForensimError::Config(
                "either data.composition_path or data.pair_tables is required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_sliders() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.similarity.jaccard, 33.0);
        assert_eq!(cfg.similarity.euclidean, 33.0);
        assert_eq!(cfg.similarity.cosine, 34.0);
        assert_eq!(cfg.similarity.scale, WeightScale::Percent);
        assert_eq!(cfg.similarity.fusion, FusionMode::Arithmetic);
        assert_eq!(cfg.server.port, 8050);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "similarity:\n  fusion: geometric\n  threshold: 0.4\n  scale: fraction\n";
        let cfg: AnalysisConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.similarity.fusion, FusionMode::Geometric);
        assert_eq!(cfg.similarity.scale, WeightScale::Fraction);
        assert_eq!(cfg.similarity.cosine, 34.0);
        assert_eq!(cfg.data.aggregation, Aggregation::Sum);
        assert!(cfg.data.derive_annotations);
    }

    #[test]
    fn test_annotations_derived_unless_disabled() {
        assert!(DataConfig::default().derive_annotations);
        let cfg: AnalysisConfig = serde_yaml::from_str("data:\n  derive_annotations: false\n").unwrap();
        assert!(!cfg.data.derive_annotations);
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forensim.yaml");
        let mut cfg = AnalysisConfig::default();
        cfg.server.port = 9000;
        cfg.data.aggregation = Aggregation::Mean;
        cfg.to_yaml(&path).unwrap();

        let loaded = AnalysisConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.server.port, 9000);
        assert_eq!(loaded.data.aggregation, Aggregation::Mean);
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut cfg = AnalysisConfig::default();
        cfg.server.port = 0;
        assert!(matches!(cfg.validate(), Err(ForensimError::Config(_))));
    }

    #[test]
    fn test_fusion_mode_parsing() {
        assert_eq!("Geometric".parse::<FusionMode>().unwrap(), FusionMode::Geometric);
        assert_eq!("arithmetic".parse::<FusionMode>().unwrap(), FusionMode::Arithmetic);
        assert!("median".parse::<FusionMode>().is_err());
    }
}
