//! Error types for Pullchain.

use thiserror::Error;

use crate::capability::ProducerKind;

/// Error type of the bridge sources (`from_iter`, `from_stream`, `channel`, ...).
///
/// Chains built on these sources use `SeqError` for callback failures too,
/// so a callback signals failure by returning `Err(SeqError::...)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// A transform, predicate, reducer or visitor callback failed
    #[error("Callback failed: {0}")]
    Callback(String),

    /// The underlying source failed to produce its next element
    #[error("Source failed: {0}")]
    Source(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl SeqError {
    /// Shorthand for a callback failure.
    pub fn callback(msg: impl Into<String>) -> Self {
        SeqError::Callback(msg.into())
    }

    /// Shorthand for a source failure.
    pub fn source(msg: impl Into<String>) -> Self {
        SeqError::Source(msg.into())
    }
}

/// Errors raised by the capability registry.
///
/// Installation itself never fails; these cover the surrounding surface
/// (defining native entries, resolving names, validating configuration).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The name is not one of the enumerated capability names
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A native entry was defined twice under the same name
    #[error("Capability already defined on {kind} producers: {name}")]
    AlreadyDefined { kind: ProducerKind, name: String },

    /// The name is known but the set has no entry for it yet
    #[error("Capability not installed on {kind} producers: {name}")]
    NotInstalled { kind: ProducerKind, name: String },

    /// Install configuration failed validation
    #[error("Invalid install configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for SeqError {
    fn from(err: std::io::Error) -> Self {
        SeqError::Source(err.to_string())
    }
}

impl From<String> for SeqError {
    fn from(msg: String) -> Self {
        SeqError::Callback(msg)
    }
}

impl From<&str> for SeqError {
    fn from(msg: &str) -> Self {
        SeqError::Callback(msg.to_string())
    }
}

/// Result type alias for pulls and terminal operations on the bridge sources.
pub type SeqResult<T> = Result<T, SeqError>;

/// Result type alias for capability registry operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_error_conversions() {
        assert_eq!(SeqError::from("boom"), SeqError::Callback("boom".to_string()));
        assert_eq!(
            SeqError::from("late".to_string()),
            SeqError::callback("late")
        );

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(SeqError::from(io), SeqError::Source(_)));
    }

    #[test]
    fn test_capability_error_display() {
        let err = CapabilityError::AlreadyDefined {
            kind: ProducerKind::Async,
            name: "map".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("async"));
        assert!(msg.contains("map"));
    }
}
