//! Error types for the IPR CLI
//!
//! User-facing errors with messages that say what failed and, where it helps,
//! what to do about it.

use ipr_common::IprError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

// ============================================================================
// Exit Codes
// ============================================================================

/// Command finished its work
pub const EXIT_SUCCESS: i32 = 0;

/// Fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Output already existed; nothing was fetched
pub const EXIT_CACHED: i32 = 3;

/// Errors surfaced by the `ipr` commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Domain identifier with no known source database
    #[error("Unsupported domain identifier '{0}'. Expected an IPR, G3DSA, PF or SSF accession (e.g., 'IPR036736').")]
    UnsupportedDomain(String),

    /// Taxonomy identifier that is not a number
    #[error("Invalid taxonomy identifier '{0}'. Expected an NCBI taxonomy ID (e.g., '2').")]
    InvalidTaxon(String),

    /// A request kept failing after every allowed retry
    #[error("Giving up after {attempts} failed attempts. LAST URL: {url} ({reason})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// A successful response whose body is not a valid page
    #[error("Malformed response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Some headers of a FASTA file could not be converted
    #[error("{failed} of {total} FASTA headers could not be converted. See the log for the offending lines.")]
    DecodeFailures { failed: usize, total: usize },

    /// Rename table is unreadable or lacks the expected columns
    #[error("Invalid rename table '{path}': {reason}")]
    RenameTable { path: String, reason: String },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// Header codec or BED conversion failed
    #[error(transparent)]
    Common(#[from] IprError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a request could not be sent
    #[error("Network request failed: {0}. Check your internet connection and the API URL.")]
    Http(#[from] reqwest::Error),

    /// Tab-separated input or output failed
    #[error("Failed to process tab-separated data: {0}")]
    Csv(#[from] csv::Error),

    /// RDF/XML document could not be parsed
    #[error("Failed to parse RDF/XML in '{path}': {reason}")]
    Xml { path: String, reason: String },

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a rename table error
    pub fn rename_table(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RenameTable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an RDF/XML parse error
    pub fn xml(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Xml {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

/// How a command that did not fail ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Work was performed
    Done,
    /// Output already existed and was left untouched
    Cached,
}

impl Completion {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Done => EXIT_SUCCESS,
            Self::Cached => EXIT_CACHED,
        }
    }
}
