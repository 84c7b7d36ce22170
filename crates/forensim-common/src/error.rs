use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForensimError {
    /// Malformed or missing input data (columns, values, sample sets).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Metric weights out of range or summing to zero.
    #[error("Invalid weights: {0}")]
    InvalidWeight(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForensimError {
    /// True for failures caused by the caller's data or parameters,
    /// as opposed to environment failures (I/O, config).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidData(_) | Self::InvalidWeight(_) | Self::InvalidThreshold(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ForensimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_kinds_are_distinguishable() {
        assert!(ForensimError::InvalidWeight("zero sum".into()).is_validation());
        assert!(ForensimError::InvalidData("no rows".into()).is_validation());
        assert!(ForensimError::InvalidThreshold("150".into()).is_validation());
        assert!(!ForensimError::Config("missing path".into()).is_validation());
    }
}
