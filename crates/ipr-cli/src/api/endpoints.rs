//! API endpoint URL builders
//!
//! Helper functions to construct InterPro and UniProt URLs.

use crate::error::{CliError, Result};
use clap::ValueEnum;
use std::fmt;

/// Records requested per InterPro page
pub const PAGE_SIZE: u32 = 200;

/// Protein database queried on InterPro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Database {
    /// All of UniProtKB
    #[default]
    Uniprot,
    /// Swiss-Prot only
    Reviewed,
}

impl Database {
    /// Path segment used by the InterPro API
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Uniprot => "UniProt",
            Self::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniprot => f.write_str("uniprot"),
            Self::Reviewed => f.write_str("reviewed"),
        }
    }
}

/// Member database a domain identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainSource {
    InterPro,
    Gene3d,
    Pfam,
    Superfamily,
}

impl DomainSource {
    /// Classify an identifier by its prefix
    pub fn parse(domain_id: &str) -> Result<Self> {
        let source = if domain_id.starts_with("IPR") {
            Self::InterPro
        } else if domain_id.starts_with("G3DSA") {
            Self::Gene3d
        } else if domain_id.starts_with("PF") {
            Self::Pfam
        } else if domain_id.starts_with("SSF") {
            Self::Superfamily
        } else {
            return Err(CliError::UnsupportedDomain(domain_id.to_string()));
        };

        if domain_id.chars().any(|c| c.is_whitespace() || c == '/' || c == '?') {
            return Err(CliError::UnsupportedDomain(domain_id.to_string()));
        }

        Ok(source)
    }

    /// Entry filter path for `domain_id`
    pub fn entry_path(self, domain_id: &str) -> String {
        match self {
            Self::InterPro => format!("entry/InterPro/{}", domain_id),
            Self::Gene3d => format!("entry/all/cathgene3d/{}", domain_id),
            Self::Pfam => format!("entry/pfam/{}", domain_id),
            Self::Superfamily => format!("entry/ssf/{}", domain_id),
        }
    }
}

/// Reject anything but a numeric taxonomy identifier
pub fn validate_taxon(taxon_id: &str) -> Result<()> {
    if taxon_id.is_empty() || !taxon_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(CliError::InvalidTaxon(taxon_id.to_string()));
    }
    Ok(())
}

/// Build the first-page URL of a protein listing filtered by entry and taxon
pub fn protein_list_url(
    base_url: &str,
    database: Database,
    domain_id: &str,
    taxon_id: &str,
) -> Result<String> {
    let source = DomainSource::parse(domain_id)?;
    validate_taxon(taxon_id)?;

    Ok(format!(
        "{}/protein/{}/{}/taxonomy/uniprot/{}/?page_size={}&extra_fields=sequence",
        base_url.trim_end_matches('/'),
        database.api_name(),
        source.entry_path(domain_id),
        taxon_id,
        PAGE_SIZE
    ))
}

/// Build the RDF/XML URL of a UniProtKB entry
pub fn uniprot_rdf_url(base_url: &str, accession: &str) -> String {
    format!(
        "{}/uniprotkb/{}?format=rdf",
        base_url.trim_end_matches('/'),
        accession
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.ebi.ac.uk:443/interpro/api";

    #[test]
    fn test_interpro_url() {
        let url = protein_list_url(BASE, Database::Uniprot, "IPR036736", "2").unwrap();
        assert_eq!(
            url,
            "https://www.ebi.ac.uk:443/interpro/api/protein/UniProt/entry/InterPro/IPR036736/taxonomy/uniprot/2/?page_size=200&extra_fields=sequence"
        );
    }

    #[test]
    fn test_gene3d_url() {
        let url = protein_list_url(BASE, Database::Reviewed, "G3DSA:3.10.129.110", "2759").unwrap();
        assert_eq!(
            url,
            "https://www.ebi.ac.uk:443/interpro/api/protein/reviewed/entry/all/cathgene3d/G3DSA:3.10.129.110/taxonomy/uniprot/2759/?page_size=200&extra_fields=sequence"
        );
    }

    #[test]
    fn test_member_database_paths() {
        assert_eq!(
            DomainSource::parse("PF00550").unwrap().entry_path("PF00550"),
            "entry/pfam/PF00550"
        );
        assert_eq!(
            DomainSource::parse("SSF47336").unwrap().entry_path("SSF47336"),
            "entry/ssf/SSF47336"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let url = protein_list_url("http://127.0.0.1:8080/", Database::Uniprot, "IPR1", "2").unwrap();
        assert!(url.starts_with("http://127.0.0.1:8080/protein/UniProt/"));
    }

    #[test]
    fn test_unsupported_domain() {
        let result = protein_list_url(BASE, Database::Uniprot, "TIGR00001", "2");
        assert!(matches!(result, Err(CliError::UnsupportedDomain(id)) if id == "TIGR00001"));

        assert!(DomainSource::parse("IPR1/../x").is_err());
    }

    #[test]
    fn test_invalid_taxon() {
        assert!(matches!(
            protein_list_url(BASE, Database::Uniprot, "IPR036736", "bacteria"),
            Err(CliError::InvalidTaxon(_))
        ));
        assert!(validate_taxon("").is_err());
        assert!(validate_taxon("9606").is_ok());
    }

    #[test]
    fn test_uniprot_rdf_url() {
        assert_eq!(
            uniprot_rdf_url("https://rest.uniprot.org", "P0A6A8"),
            "https://rest.uniprot.org/uniprotkb/P0A6A8?format=rdf"
        );
    }

    #[test]
    fn test_database_names() {
        assert_eq!(Database::Uniprot.api_name(), "UniProt");
        assert_eq!(Database::Reviewed.api_name(), "reviewed");
        assert_eq!(Database::Reviewed.to_string(), "reviewed");
    }
}
