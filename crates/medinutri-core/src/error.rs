use thiserror::Error;

use crate::types::EntityKind;

/// Top-level error type for the MediNutri system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for MediNutriError` so that `?` works across
/// crate boundaries. Absence of data is never an error: empty match lists
/// and fallback answers are ordinary results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MediNutriError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load {kind} data: {reason}")]
    DataLoad { kind: String, reason: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MediNutriError {
    /// Build a `DataLoad` error for a dataset kind.
    pub fn data_load(kind: EntityKind, reason: impl Into<String>) -> Self {
        MediNutriError::DataLoad {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for MediNutriError {
    fn from(err: toml::de::Error) -> Self {
        MediNutriError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MediNutriError {
    fn from(err: toml::ser::Error) -> Self {
        MediNutriError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MediNutriError {
    fn from(err: serde_json::Error) -> Self {
        MediNutriError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for MediNutri operations.
pub type Result<T> = std::result::Result<T, MediNutriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MediNutriError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_data_load_display_names_kind() {
        let err = MediNutriError::data_load(EntityKind::Interaction, "bad quoting at line 4");
        assert_eq!(
            err.to_string(),
            "Failed to load interaction data: bad quoting at line 4"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MediNutriError = io_err.into();
        assert!(matches!(err, MediNutriError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_becomes_config() {
        let parse_err = toml::from_str::<toml::Value>("[general\nport = ").unwrap_err();
        let err: MediNutriError = parse_err.into();
        assert!(matches!(err, MediNutriError::Config(_)));
    }

    #[test]
    fn test_json_error_becomes_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: MediNutriError = json_err.into();
        assert!(matches!(err, MediNutriError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(MediNutriError, &str)> = vec![
            (
                MediNutriError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                MediNutriError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
            (
                MediNutriError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
