//! Paginated downloads with retry and atomic output

pub mod engine;
pub mod output;
pub mod retry;

pub use engine::{Body, FetchOutcome, FetchReport, PageFetcher};
pub use output::{write_atomic, AtomicOutput};
pub use retry::{RetryDecision, RetryPolicy};
