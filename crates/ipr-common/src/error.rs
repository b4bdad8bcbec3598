//! Error types for IPR tools

use thiserror::Error;

/// Result type alias for IPR operations
pub type Result<T> = std::result::Result<T, IprError>;

/// Main error type for IPR tools
#[derive(Error, Debug)]
pub enum IprError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Header has no sequence identifier: '{0}'")]
    MissingIdentifier(String),

    #[error("Header has no domain annotations: '{0}'")]
    NoDomains(String),

    #[error("Malformed domain annotation in header '{header}': {reason}")]
    MalformedDomains { header: String, reason: String },

    #[error("Invalid coordinate '{value}' in header '{header}'")]
    InvalidCoordinate { header: String, value: String },

    #[error("No rename entry for domain label '{0}'")]
    UnknownLabel(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IprError {
    pub(crate) fn malformed(header: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDomains {
            header: header.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error describes a single header that could not be decoded.
    ///
    /// Callers processing whole files report these per record and keep going.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            IprError::MissingIdentifier(_)
                | IprError::NoDomains(_)
                | IprError::MalformedDomains { .. }
                | IprError::InvalidCoordinate { .. }
                | IprError::UnknownLabel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failure_classification() {
        assert!(IprError::MissingIdentifier(String::new()).is_decode_failure());
        assert!(IprError::malformed("A\tB", "unbalanced").is_decode_failure());
        assert!(!IprError::Config("bad".to_string()).is_decode_failure());
        assert!(!IprError::Io(std::io::Error::other("disk")).is_decode_failure());
    }
}
