//! Error types for the remediation engine.
//!
//! Heuristic uncertainty is never an error: ambiguous or malformed structure is
//! recorded in the statistics as unresolved and the pass moves on. The variants
//! below cover arena misuse, configuration problems and upstream I/O.

use crate::structure::NodeId;

/// Result type alias for remediation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while remediating a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while loading or saving a snapshot or configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Node id does not address a live node in the structure tree
    #[error("Structure node not found: {0}")]
    NodeNotFound(NodeId),

    /// Requested tree operation would break the tree invariants
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// Page index outside the document
    #[error("Page index out of range: {0}")]
    PageOutOfRange(usize),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Description provider failure
    #[error("Description provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_error() {
        let err = Error::NodeNotFound(NodeId::from_index(7));
        let msg = format!("{}", err);
        assert!(msg.contains("not found"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_invalid_config_error() {
        let err = Error::InvalidConfig("max_pages must be positive".to_string());
        assert_eq!(format!("{}", err), "Invalid configuration: max_pages must be positive");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).contains("missing.json"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
