//! IPR Common Library
//!
//! Shared model, codecs, and utilities for the IPR tools.
//!
//! # Overview
//!
//! - **Model**: Serde types for InterPro API pages
//! - **Header**: Domain-aware FASTA header encoding and decoding
//! - **BED**: Domain intervals as BED regions
//! - **FASTA**: Header-line scanning
//! - **Logging**: Shared `tracing` setup
//!
//! # Example
//!
//! ```no_run
//! use ipr_common::header::{DecodeMode, HeaderDecoder};
//!
//! fn first_domain(line: &str) -> ipr_common::Result<Option<String>> {
//!     let decoder = HeaderDecoder::new(DecodeMode::Grammar)?;
//!     let header = decoder.decode(line)?;
//!     Ok(header.domains().first().map(|d| d.accession.clone()))
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod bed;
pub mod error;
pub mod fasta;
pub mod header;
pub mod logging;
pub mod model;
pub mod paths;

// Re-export commonly used types
pub use error::{IprError, Result};
