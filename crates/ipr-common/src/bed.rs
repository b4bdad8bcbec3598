//! BED regions from domain-annotated headers
//!
//! Each domain of a header becomes one [`BedTrack`]: the intervals of that
//! domain on that sequence, written to `<seq_id>_<domain>.bed`.
//!
//! Coordinates are the header's 1-based positions with one subtracted from
//! *both* start and end. Existing downstream files were produced this way, so
//! the arithmetic is kept as is even though it is not the half-open BED
//! convention.

use crate::error::{IprError, Result};
use crate::header::FastaHeader;
use crate::model::Fragment;
use crate::paths::sanitize_filename;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

/// One BED line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRegion {
    pub sequence_id: String,
    pub start0: u64,
    pub end0: u64,
    pub label: String,
}

impl BedRegion {
    /// Shift a 1-based fragment down by one on both ends
    pub fn from_fragment(
        sequence_id: &str,
        fragment: &Fragment,
        label: impl Into<String>,
    ) -> Result<Self> {
        let shift = |value: u64| {
            value.checked_sub(1).ok_or_else(|| IprError::InvalidCoordinate {
                header: sequence_id.to_string(),
                value: value.to_string(),
            })
        };

        Ok(Self {
            sequence_id: sequence_id.to_string(),
            start0: shift(fragment.start)?,
            end0: shift(fragment.end)?,
            label: label.into(),
        })
    }
}

impl fmt::Display for BedRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.sequence_id, self.start0, self.end0, self.label
        )
    }
}

/// Which domains of a header are converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainSelection {
    /// Every domain in the header
    #[default]
    All,
    /// Only the first domain, as older conversions did
    First,
}

/// Maps domain accessions to short names; each interval gets `<name><n>`
#[derive(Debug, Clone, Default)]
pub struct RenameRule {
    names: HashMap<String, String>,
}

impl RenameRule {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    pub fn insert(&mut self, accession: impl Into<String>, short_name: impl Into<String>) {
        self.names.insert(accession.into(), short_name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label for the `index`-th (1-based) interval of `accession`
    pub fn label(&self, accession: &str, index: usize) -> Result<String> {
        self.names
            .get(accession)
            .map(|short_name| format!("{}{}", short_name, index))
            .ok_or_else(|| IprError::UnknownLabel(accession.to_string()))
    }
}

impl FromIterator<(String, String)> for RenameRule {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Intervals of one domain on one sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedTrack {
    pub sequence_id: String,
    pub domain: String,
    pub regions: Vec<BedRegion>,
}

impl BedTrack {
    /// Output file name, `<seq_id>_<domain>.bed`, safe for any file system
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.bed",
            sanitize_filename(&self.sequence_id),
            sanitize_filename(&self.domain)
        )
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for region in &self.regions {
            writeln!(writer, "{}", region)?;
        }
        Ok(())
    }
}

/// Convert a decoded header into BED tracks.
///
/// Domains without fragments are skipped; a header left with nothing to
/// write is reported as [`IprError::NoDomains`]. A repeated domain accession
/// is merged into one track.
pub fn tracks_for_header(
    header: &FastaHeader,
    selection: DomainSelection,
    rename: Option<&RenameRule>,
) -> Result<Vec<BedTrack>> {
    let domains = match selection {
        DomainSelection::All => header.domains(),
        DomainSelection::First => &header.domains()[..header.domains().len().min(1)],
    };

    let mut tracks: Vec<BedTrack> = Vec::new();
    for domain in domains {
        let existing = tracks.iter().position(|t| t.domain == domain.accession);
        let position = match existing {
            Some(position) => position,
            None => {
                tracks.push(BedTrack {
                    sequence_id: header.id.clone(),
                    domain: domain.accession.clone(),
                    regions: Vec::new(),
                });
                tracks.len() - 1
            },
        };
        let track = &mut tracks[position];

        for fragment in domain.fragments() {
            let label = match rename {
                Some(rule) => rule.label(&domain.accession, track.regions.len() + 1)?,
                None => domain.accession.clone(),
            };
            track
                .regions
                .push(BedRegion::from_fragment(&header.id, fragment, label)?);
        }
    }

    tracks.retain(|track| !track.regions.is_empty());
    if tracks.is_empty() {
        return Err(IprError::NoDomains(header.to_string()));
    }

    Ok(tracks)
}
