//! InterPro API page model
//!
//! Serde types for one page of the InterPro `protein` listing endpoint:
//!
//! ```json
//! {
//!   "next": "https://www.ebi.ac.uk/interpro/api/protein/...&cursor=...",
//!   "results": [
//!     {
//!       "metadata": { "accession": "A0A0B4J2F0", "name": "Acyl carrier protein" },
//!       "extra_fields": { "sequence": "MSE..." },
//!       "entry_subset": [
//!         {
//!           "accession": "IPR036736",
//!           "entry_protein_locations": [
//!             { "fragments": [ { "start": 2, "end": 77 } ] }
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// One page of results plus the cursor for the following page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// URL of the next page; `None` (or empty) on the last page
    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub results: Vec<ResultItem>,
}

impl Page {
    /// Next-page cursor, treating an empty string the same as `null`
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }
}

/// One protein record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub metadata: ProteinMetadata,

    pub extra_fields: ExtraFields,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_subset: Option<Vec<DomainAnnotation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<DomainAnnotation>>,
}

impl ResultItem {
    /// Domain annotations carried by this record.
    ///
    /// The API names the field `entry_subset` when the listing is filtered by
    /// entry and `entries` otherwise; `entry_subset` wins when both exist.
    pub fn domains(&self) -> Option<&[DomainAnnotation]> {
        self.entry_subset
            .as_deref()
            .or(self.entries.as_deref())
    }

    pub fn accession(&self) -> &str {
        &self.metadata.accession
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn sequence(&self) -> &str {
        &self.extra_fields.sequence
    }
}

/// Protein identity fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinMetadata {
    pub accession: String,

    #[serde(default)]
    pub name: String,
}

/// Fields requested through `extra_fields=sequence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFields {
    pub sequence: String,
}

/// A domain or family match on one protein
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAnnotation {
    pub accession: String,

    #[serde(default)]
    pub entry_protein_locations: Option<Vec<LocationGroup>>,
}

impl DomainAnnotation {
    pub fn locations(&self) -> &[LocationGroup] {
        self.entry_protein_locations.as_deref().unwrap_or_default()
    }
}

/// One location of a domain, possibly split into several fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationGroup {
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

/// Contiguous residue interval, 1-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub start: u64,
    pub end: u64,
}

impl Fragment {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let json = r#"{
            "count": 2,
            "next": "https://example.org/page2",
            "previous": null,
            "results": [
                {
                    "metadata": {"accession": "P1", "name": "First", "source_database": "reviewed"},
                    "extra_fields": {"sequence": "MKV"},
                    "entry_subset": [
                        {
                            "accession": "IPR036736",
                            "entry_protein_locations": [
                                {"fragments": [{"start": 2, "end": 77, "dc-status": "CONTINUOUS"}], "model": null}
                            ]
                        }
                    ]
                },
                {
                    "metadata": {"accession": "P2", "name": "Second"},
                    "extra_fields": {"sequence": "MA"}
                }
            ]
        }"#;

        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_cursor(), Some("https://example.org/page2"));
        assert_eq!(page.results.len(), 2);

        let first = &page.results[0];
        let domains = first.domains().unwrap();
        assert_eq!(domains[0].accession, "IPR036736");
        assert_eq!(domains[0].locations()[0].fragments[0], Fragment::new(2, 77));

        assert!(page.results[1].domains().is_none());
    }

    #[test]
    fn test_last_page_cursor() {
        let page: Page = serde_json::from_str(r#"{"next": null, "results": []}"#).unwrap();
        assert_eq!(page.next_cursor(), None);

        let page: Page = serde_json::from_str(r#"{"next": "", "results": []}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn test_entries_fallback() {
        let json = r#"{
            "metadata": {"accession": "P3", "name": "Third"},
            "extra_fields": {"sequence": "M"},
            "entries": [{"accession": "G3DSA:3.10.129.110", "entry_protein_locations": null}]
        }"#;

        let item: ResultItem = serde_json::from_str(json).unwrap();
        let domains = item.domains().unwrap();
        assert_eq!(domains[0].accession, "G3DSA:3.10.129.110");
        assert!(domains[0].locations().is_empty());
    }
}
