//! `ipr rdf` command implementation
//!
//! Downloads the UniProtKB RDF/XML entry of every sequence in a FASTA file.

use crate::api::{InterProClient, ACCEPT_RDF_XML};
use crate::config::Config;
use crate::error::{Completion, Result};
use crate::fetch::{write_atomic, Body, FetchReport, PageFetcher, RetryPolicy};
use crate::progress;
use colored::Colorize;
use indicatif::ProgressBar;
use ipr_common::fasta::header_lines;
use ipr_common::paths::sanitize_filename;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Suffix of downloaded entries; `ipr mnemonics` scans for it
pub const RDF_SUFFIX: &str = ".rdf.xml";

/// Arguments of `ipr rdf`
#[derive(Debug, Clone)]
pub struct RdfArgs {
    pub fasta: PathBuf,
    pub output_dir: PathBuf,
}

/// Counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RdfSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub empty: usize,
}

/// Identifiers of every header, in file order
pub fn sequence_ids<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for line in header_lines(reader) {
        let line = line?;
        match line.sequence_id() {
            Some(id) => ids.push(id.to_string()),
            None => warn!(line = line.line_number, "Header has no identifier, skipping"),
        }
    }
    Ok(ids)
}

/// Destination of one entry
pub fn entry_path(output_dir: &Path, accession: &str) -> PathBuf {
    output_dir.join(format!("{}{}", sanitize_filename(accession), RDF_SUFFIX))
}

pub async fn run(config: &Config, args: RdfArgs) -> Result<Completion> {
    run_with_policy(config, args, RetryPolicy::default()).await
}

pub async fn run_with_policy(
    config: &Config,
    args: RdfArgs,
    policy: RetryPolicy,
) -> Result<Completion> {
    let fetcher = PageFetcher::with_policy(InterProClient::new(config)?, policy);
    let accessions = sequence_ids(BufReader::new(File::open(&args.fasta)?))?;

    let pb = progress::create_progress_bar(accessions.len() as u64, "Downloading RDF entries");
    let summary = match download_entries(&fetcher, &accessions, &args.output_dir, &pb).await {
        Ok(summary) => summary,
        Err(e) => {
            pb.abandon();
            return Err(e);
        },
    };
    pb.finish_and_clear();

    eprintln!(
        "{} Downloaded {} RDF entries to {} ({} already present, {} without content)",
        "✓".green(),
        summary.downloaded,
        args.output_dir.display(),
        summary.skipped,
        summary.empty
    );

    Ok(Completion::Done)
}

/// Download every missing entry into `output_dir`.
///
/// A request that follows a download waits for the policy's page delay
/// first. Nothing sleeps after the last entry or after an empty response.
pub async fn download_entries(
    fetcher: &PageFetcher,
    accessions: &[String],
    output_dir: &Path,
    pb: &ProgressBar,
) -> Result<RdfSummary> {
    fs::create_dir_all(output_dir)?;

    let mut summary = RdfSummary::default();
    let mut pause = false;
    for accession in accessions {
        pb.inc(1);
        let path = entry_path(output_dir, accession);
        if path.exists() {
            pb.suspend(|| {
                eprintln!("{} {} already exists. Skipping...", "✓".green(), path.display());
            });
            summary.skipped += 1;
            continue;
        }

        if pause {
            tokio::time::sleep(fetcher.policy().page_delay).await;
        }

        let url = fetcher.client().uniprot_rdf_url(accession);
        let mut report = FetchReport::default();
        match fetcher.request(&url, ACCEPT_RDF_XML, &mut report).await? {
            Body::Content(body) => {
                write_atomic(&path, &body)?;
                info!(accession = %accession, requests = report.requests, "Downloaded RDF entry");
                summary.downloaded += 1;
                pause = true;
            },
            Body::NoContent => {
                warn!(accession = %accession, "UniProt returned no content");
                summary.empty += 1;
                pause = false;
            },
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids() {
        let fasta = ">P1\tIPR1(1...5)\tFirst\nMKV\n> \nMA\n>P2 free text\nMA\n";
        let ids = sequence_ids(std::io::Cursor::new(fasta)).unwrap();
        assert_eq!(ids, vec!["P1", "P2"]);
    }

    #[test]
    fn test_entry_path() {
        assert_eq!(
            entry_path(Path::new("rdf"), "P0A6A8"),
            PathBuf::from("rdf/P0A6A8.rdf.xml")
        );
        assert_eq!(
            entry_path(Path::new("rdf"), "sp|P0A6A8|ACP"),
            PathBuf::from("rdf/spP0A6A8ACP.rdf.xml")
        );
    }
}
