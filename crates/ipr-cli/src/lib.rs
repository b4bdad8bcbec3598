//! IPR CLI Library
//!
//! Command-line tools around the InterPro REST API.
//!
//! # Overview
//!
//! - **Fetch**: Download every protein of a domain and taxon as
//!   domain-annotated FASTA (`ipr fetch`)
//! - **BED**: Turn annotated headers into per-domain BED files (`ipr bed`)
//! - **RDF**: Download UniProtKB RDF/XML entries for a FASTA file (`ipr rdf`)
//! - **Mnemonics**: List accession/mnemonic pairs from those entries
//!   (`ipr mnemonics`)

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod rdfxml;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Completion, Result};

use api::Database;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{bed::BedArgs, fetch::FetchArgs, mnemonics::MnemonicsArgs, rdf::RdfArgs};
use ipr_common::bed::DomainSelection;
use ipr_common::header::DecodeMode;
use std::path::PathBuf;

/// IPR - InterPro domain-aware FASTA tools
#[derive(Parser, Debug)]
#[command(name = "ipr")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download domain-annotated FASTA for a domain and taxon
    ///
    /// Exits with status 3 when the output file already exists.
    Fetch {
        /// Domain to search for (e.g. IPR036736 for ACP domains)
        domain_id: String,

        /// Taxonomy ID to filter by (e.g. 2 for bacteria)
        taxon_id: String,

        /// Database to search
        #[arg(short = 'd', long = "db", value_enum, default_value_t = Database::Uniprot)]
        database: Database,

        /// Output file name, placed inside the output folder
        /// [default: <db>_<domain_id>_<taxon_id>.fasta]
        #[arg(short = 'o', long = "output-file")]
        output: Option<String>,

        /// Output folder [env: IPR_OUTPUT_DIR] [default: downloads]
        #[arg(short = 'f', long = "output-folder")]
        folder: Option<PathBuf>,

        /// InterPro API base URL [env: IPR_API_URL]
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Write one BED file per sequence and domain of an annotated FASTA
    Bed {
        /// FASTA file with domain-annotated headers
        fasta: PathBuf,

        /// Output folder
        #[arg(short = 'o', long = "output-folder", default_value = "bed")]
        output_dir: PathBuf,

        /// Domains to convert from each header
        #[arg(long, value_enum, default_value_t = DomainChoice::All)]
        domains: DomainChoice,

        /// Tab-separated table mapping InterProScan_annotated_region to
        /// Short_PKS_nomenclature; intervals are labelled <name><n>
        #[arg(long)]
        rename: Option<PathBuf>,

        /// Read headers the way older conversions did (first domain only,
        /// fragment and group separators interchangeable)
        #[arg(long)]
        legacy: bool,
    },

    /// Download UniProtKB RDF/XML entries for every FASTA header
    Rdf {
        /// FASTA file whose header identifiers are UniProtKB accessions
        fasta: PathBuf,

        /// Output folder
        #[arg(short = 'o', long = "output-folder", default_value = "rdf")]
        output_dir: PathBuf,

        /// UniProt REST base URL [env: IPR_UNIPROT_URL]
        #[arg(long)]
        uniprot_url: Option<String>,
    },

    /// List accession and mnemonic pairs from downloaded RDF/XML entries
    Mnemonics {
        /// Folder holding *.rdf.xml files
        #[arg(default_value = "rdf")]
        dir: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Domain selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DomainChoice {
    All,
    First,
}

impl From<DomainChoice> for DomainSelection {
    fn from(choice: DomainChoice) -> Self {
        match choice {
            DomainChoice::All => DomainSelection::All,
            DomainChoice::First => DomainSelection::First,
        }
    }
}

/// Execute a parsed command line
///
/// Only the network commands read the environment configuration; flags are
/// applied on top of it before the client validates the result.
pub async fn run(cli: Cli) -> Result<Completion> {
    match cli.command {
        Commands::Fetch {
            domain_id,
            taxon_id,
            database,
            output,
            folder,
            api_url,
        } => {
            let config = Config::from_env()?;
            let folder = folder.unwrap_or_else(|| config.output_dir.clone());
            let config = match api_url {
                Some(url) => config.with_api_url(url),
                None => config,
            };
            commands::fetch::run(
                &config,
                FetchArgs {
                    domain_id,
                    taxon_id,
                    database,
                    output,
                    folder,
                },
            )
            .await
        },
        Commands::Bed {
            fasta,
            output_dir,
            domains,
            rename,
            legacy,
        } => commands::bed::run(BedArgs {
            fasta,
            output_dir,
            selection: domains.into(),
            rename,
            mode: if legacy {
                DecodeMode::Legacy
            } else {
                DecodeMode::Grammar
            },
        }),
        Commands::Rdf {
            fasta,
            output_dir,
            uniprot_url,
        } => {
            let config = Config::from_env()?;
            let config = match uniprot_url {
                Some(url) => config.with_uniprot_url(url),
                None => config,
            };
            commands::rdf::run(&config, RdfArgs { fasta, output_dir }).await
        },
        Commands::Mnemonics { dir, output } => {
            commands::mnemonics::run(MnemonicsArgs { dir, output })
        },
    }
}
