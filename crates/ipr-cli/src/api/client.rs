//! HTTP client for the InterPro and UniProt APIs
//!
//! A thin wrapper over [`reqwest::Client`] that knows the configured base
//! URLs. Status handling and retries belong to [`crate::fetch`].

use crate::api::endpoints::{self, Database};
use crate::config::Config;
use crate::error::Result;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use tracing::debug;

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_RDF_XML: &str = "application/rdf+xml";

/// API client for InterPro listings and UniProt entries
#[derive(Debug, Clone)]
pub struct InterProClient {
    client: Client,
    api_url: String,
    uniprot_url: String,
}

impl InterProClient {
    /// Create a new client from resolved configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("ipr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            uniprot_url: config.uniprot_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn uniprot_url(&self) -> &str {
        &self.uniprot_url
    }

    /// First-page URL of the protein listing for a domain and taxon
    pub fn protein_list_url(
        &self,
        database: Database,
        domain_id: &str,
        taxon_id: &str,
    ) -> Result<String> {
        endpoints::protein_list_url(&self.api_url, database, domain_id, taxon_id)
    }

    /// RDF/XML URL of a UniProtKB entry
    pub fn uniprot_rdf_url(&self, accession: &str) -> String {
        endpoints::uniprot_rdf_url(&self.uniprot_url, accession)
    }

    /// Send one GET request. Any status is returned as a response.
    pub async fn get(&self, url: &str, accept: &str) -> reqwest::Result<Response> {
        debug!(url = %url, "GET");
        self.client.get(url).header(ACCEPT, accept).send().await
    }
}
