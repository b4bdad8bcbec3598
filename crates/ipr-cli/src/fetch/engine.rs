//! Paginated fetch engine
//!
//! Follows the `next` cursor of an InterPro protein listing from the first
//! page to the last, streaming every record as a FASTA entry into an
//! [`AtomicOutput`]. Each request goes through the [`RetryPolicy`].

use crate::api::{InterProClient, ACCEPT_JSON};
use crate::error::{CliError, Result};
use crate::fetch::output::AtomicOutput;
use crate::fetch::retry::{AttemptFailure, RetryDecision, RetryPolicy};
use indicatif::ProgressBar;
use ipr_common::header::write_record;
use ipr_common::model::Page;
use reqwest::StatusCode;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Request counters of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Pages decoded
    pub pages: u32,
    /// FASTA records written
    pub records: u64,
    /// HTTP requests sent, retries included
    pub requests: u32,
    /// Uncounted retries after HTTP 408
    pub timeouts: u32,
    /// Counted retries after any other failure
    pub retries: u32,
}

/// Result of [`PageFetcher::fetch_to_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The output already existed; no request was made
    Cached,
    /// Every page was fetched and the output committed
    Completed(FetchReport),
}

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Content(Vec<u8>),
    /// HTTP 204: nothing more to read
    NoContent,
}

/// Drives requests through a retry policy
#[derive(Clone)]
pub struct PageFetcher {
    client: InterProClient,
    policy: RetryPolicy,
    progress: Option<ProgressBar>,
}

impl PageFetcher {
    pub fn new(client: InterProClient) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    pub fn with_policy(client: InterProClient, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            progress: None,
        }
    }

    /// Report page progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn client(&self) -> &InterProClient {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch every page starting at `first_url` into `path`.
    ///
    /// Returns [`FetchOutcome::Cached`] without touching the network when
    /// `path` already exists. On error the final path stays absent and the
    /// partial temporary file is left behind.
    pub async fn fetch_to_file(&self, first_url: &str, path: &Path) -> Result<FetchOutcome> {
        if path.exists() {
            info!(path = %path.display(), "Output already exists, skipping fetch");
            return Ok(FetchOutcome::Cached);
        }

        let mut output = AtomicOutput::create(path)?;
        debug!(temp = %output.temp_path().display(), "Writing to temporary file");

        let report = self.fetch_pages(first_url, &mut output).await?;
        output.commit()?;

        info!(
            path = %path.display(),
            pages = report.pages,
            records = report.records,
            "Fetch complete"
        );
        Ok(FetchOutcome::Completed(report))
    }

    /// Fetch every page starting at `first_url`, writing FASTA to `writer`
    pub async fn fetch_pages<W: Write>(&self, first_url: &str, writer: &mut W) -> Result<FetchReport> {
        let mut report = FetchReport::default();
        let mut next = Some(first_url.to_string());

        while let Some(url) = next.take() {
            let body = match self.request(&url, ACCEPT_JSON, &mut report).await? {
                Body::Content(body) => body,
                Body::NoContent => {
                    info!(url = %url, "No content, stopping");
                    break;
                },
            };

            let page: Page = serde_json::from_slice(&body)
                .map_err(|source| CliError::InvalidResponse { url: url.clone(), source })?;

            for item in &page.results {
                write_record(writer, item)?;
            }
            report.pages += 1;
            report.records += page.results.len() as u64;

            info!(page = report.pages, records = report.records, "Fetched page");
            if let Some(pb) = &self.progress {
                pb.set_message(format!(
                    "page {} ({} records)",
                    report.pages, report.records
                ));
            }

            next = page.next_cursor().map(str::to_string);
            if next.is_some() {
                tokio::time::sleep(self.policy.page_delay).await;
            }
        }

        writer.flush()?;
        Ok(report)
    }

    /// Send GET requests to `url` until one succeeds or the policy gives up
    pub async fn request(&self, url: &str, accept: &str, report: &mut FetchReport) -> Result<Body> {
        let mut failures = 0;

        loop {
            report.requests += 1;

            let failure = match self.client.get(url, accept).await {
                Ok(response) if response.status() == StatusCode::NO_CONTENT => {
                    return Ok(Body::NoContent);
                },
                Ok(response) if response.status().is_success() => match response.bytes().await {
                    Ok(bytes) => return Ok(Body::Content(bytes.to_vec())),
                    Err(e) => AttemptFailure::Transport(e),
                },
                Ok(response) => AttemptFailure::Status(response.status()),
                Err(e) => AttemptFailure::Transport(e),
            };

            match self.policy.decide(&failure, failures) {
                RetryDecision::Retry {
                    delay,
                    counted: false,
                } => {
                    report.timeouts += 1;
                    warn!(
                        url = %url,
                        "Server timed out ({}). Retrying in {}s...",
                        failure,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                },
                RetryDecision::Retry {
                    delay,
                    counted: true,
                } => {
                    failures += 1;
                    report.retries += 1;
                    warn!(
                        url = %url,
                        "Request failed ({}), retry {}/{}. Retrying in {}s...",
                        failure,
                        failures,
                        self.policy.max_retries,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                },
                RetryDecision::GiveUp => {
                    return Err(CliError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: failures + 1,
                        reason: failure.to_string(),
                    });
                },
            }
        }
    }
}
