//! `ipr fetch` command implementation
//!
//! Downloads every protein of a domain and taxon as domain-annotated FASTA.

use crate::api::{Database, InterProClient};
use crate::config::Config;
use crate::error::{Completion, Result};
use crate::fetch::{FetchOutcome, PageFetcher, RetryPolicy};
use crate::progress;
use colored::Colorize;
use ipr_common::paths::sanitize_filename;
use std::path::{Path, PathBuf};

/// Arguments of `ipr fetch`
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub domain_id: String,
    pub taxon_id: String,
    pub database: Database,
    /// File name inside `folder`; derived from the query when absent
    pub output: Option<String>,
    pub folder: PathBuf,
}

impl FetchArgs {
    /// `<db>_<domain>_<taxon>.fasta`, safe for any file system
    pub fn default_file_name(&self) -> String {
        sanitize_filename(&format!(
            "{}_{}_{}.fasta",
            self.database, self.domain_id, self.taxon_id
        ))
    }

    /// Destination path: the file name always lands inside the folder
    pub fn output_path(&self) -> PathBuf {
        let name = self
            .output
            .clone()
            .unwrap_or_else(|| self.default_file_name());
        self.folder.join(name)
    }
}

/// Fetch with the default retry policy
pub async fn run(config: &Config, args: FetchArgs) -> Result<Completion> {
    run_with_policy(config, args, RetryPolicy::default()).await
}

pub async fn run_with_policy(
    config: &Config,
    args: FetchArgs,
    policy: RetryPolicy,
) -> Result<Completion> {
    let client = InterProClient::new(config)?;
    let first_url = client.protein_list_url(args.database, &args.domain_id, &args.taxon_id)?;
    let path = args.output_path();

    if path.exists() {
        print_cached(&path);
        return Ok(Completion::Cached);
    }

    eprintln!(
        "{} Fetching {} proteins for {} (taxon {})...",
        "→".cyan(),
        args.database,
        args.domain_id,
        args.taxon_id
    );

    let spinner = progress::create_spinner("page 0 (0 records)");
    let fetcher = PageFetcher::with_policy(client, policy).with_progress(spinner.clone());
    let result = fetcher.fetch_to_file(&first_url, &path).await;
    spinner.finish_and_clear();

    match result? {
        FetchOutcome::Cached => {
            print_cached(&path);
            Ok(Completion::Cached)
        },
        FetchOutcome::Completed(report) => {
            eprintln!(
                "{} Wrote {} records from {} page(s) to {}",
                "✓".green(),
                report.records,
                report.pages,
                path.display()
            );
            Ok(Completion::Done)
        },
    }
}

fn print_cached(path: &Path) {
    eprintln!(
        "{} Output file {} already exists, assuming it is cached. Delete it to download afresh.",
        "✓".green(),
        path.display()
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(output: Option<&str>) -> FetchArgs {
        FetchArgs {
            domain_id: "G3DSA:3.10.129.110".to_string(),
            taxon_id: "2".to_string(),
            database: Database::Reviewed,
            output: output.map(str::to_string),
            folder: PathBuf::from("downloads"),
        }
    }

    #[test]
    fn test_default_file_name_is_sanitized() {
        assert_eq!(
            args(None).default_file_name(),
            "reviewed_G3DSA3.10.129.110_2.fasta"
        );
        assert_eq!(
            args(None).output_path(),
            PathBuf::from("downloads/reviewed_G3DSA3.10.129.110_2.fasta")
        );
    }

    #[test]
    fn test_explicit_output_joins_folder() {
        assert_eq!(
            args(Some("acp.fasta")).output_path(),
            PathBuf::from("downloads/acp.fasta")
        );
    }
}
