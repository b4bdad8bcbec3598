//! Domain-aware FASTA header codec
//!
//! Records written by `ipr fetch` carry their InterPro domain locations in the
//! FASTA header so downstream tools can recover them without calling the API
//! again. The header grammar is:
//!
//! ```text
//! header    := '>' id TAB [ summary TAB ] description
//! summary   := domain ( '-' domain )*
//! domain    := accession '(' [ group ( ';' group )* ] ')'
//! group     := fragment ( ',' fragment )*
//! fragment  := start '...' end
//! ```
//!
//! For example `>A0A0B4J2F0\tIPR036736(2...77)\tAcyl carrier protein`.
//!
//! Two decoders are provided. [`DecodeMode::Grammar`] parses the full grammar
//! above, multiple domains included. [`DecodeMode::Legacy`] reproduces the
//! historical reading used by older BED conversions: it only looks at the
//! first domain, takes the first parenthesised coordinate list, and treats
//! `,` and `;` as interchangeable interval separators.

use crate::error::{IprError, Result};
use crate::model::{DomainAnnotation, Fragment, ResultItem};
use regex::Regex;
use std::fmt;
use std::io::Write;

// ============================================================================
// Format Constants
// ============================================================================

/// Separator between header fields
pub const HEADER_SEPARATOR: char = '\t';

/// Residues per sequence line
pub const LINE_WIDTH: usize = 80;

/// Separator between domains in the summary field
pub const DOMAIN_SEPARATOR: char = '-';

/// Separator between location groups of one domain
pub const GROUP_SEPARATOR: char = ';';

/// Separator between fragments of one location group
pub const FRAGMENT_SEPARATOR: char = ',';

/// Separator between start and end of a fragment
pub const RANGE_SEPARATOR: &str = "...";

/// Coordinate list as read by the legacy decoder
const LEGACY_COORDINATES: &str = r"\((\d+\.\.\.\d+(?:[,;]\d+\.\.\.\d+)*)\)";

// ============================================================================
// Types
// ============================================================================

/// Domain accession with its location groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSummary {
    pub accession: String,
    pub locations: Vec<Vec<Fragment>>,
}

impl DomainSummary {
    pub fn new(accession: impl Into<String>, locations: Vec<Vec<Fragment>>) -> Self {
        Self {
            accession: accession.into(),
            locations,
        }
    }

    /// All fragments in header order
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.locations.iter().flatten()
    }
}

impl From<&DomainAnnotation> for DomainSummary {
    fn from(annotation: &DomainAnnotation) -> Self {
        Self {
            accession: annotation.accession.clone(),
            locations: annotation
                .locations()
                .iter()
                .map(|group| group.fragments.clone())
                .collect(),
        }
    }
}

impl fmt::Display for DomainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.accession)?;
        for (i, group) in self.locations.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", GROUP_SEPARATOR)?;
            }
            for (j, fragment) in group.iter().enumerate() {
                if j > 0 {
                    write!(f, "{}", FRAGMENT_SEPARATOR)?;
                }
                write!(f, "{}{}{}", fragment.start, RANGE_SEPARATOR, fragment.end)?;
            }
        }
        write!(f, ")")
    }
}

/// A decoded (or to-be-encoded) FASTA header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaHeader {
    /// Sequence identifier (UniProt accession)
    pub id: String,

    /// Domain summary; `None` when the header has no summary field at all
    pub domains: Option<Vec<DomainSummary>>,

    /// Free-text protein name
    pub description: String,
}

impl FastaHeader {
    /// Build the header for one API record
    pub fn from_item(item: &ResultItem) -> Self {
        Self {
            id: item.accession().to_string(),
            domains: item
                .domains()
                .map(|domains| domains.iter().map(DomainSummary::from).collect()),
            description: item.name().to_string(),
        }
    }

    /// Domains in header order (empty when the header has none)
    pub fn domains(&self) -> &[DomainSummary] {
        self.domains.as_deref().unwrap_or_default()
    }

    /// Encode the domain summary field, or `None` when the header has none
    pub fn summary(&self) -> Option<String> {
        self.domains.as_ref().map(|domains| {
            domains
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(&*DOMAIN_SEPARATOR.to_string())
        })
    }
}

impl fmt::Display for FastaHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">{}{}", self.id, HEADER_SEPARATOR)?;
        if let Some(summary) = self.summary() {
            write!(f, "{}{}", summary, HEADER_SEPARATOR)?;
        }
        write!(f, "{}", self.description)
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Split a sequence into lines of at most `width` residues.
///
/// An empty sequence yields no lines.
pub fn wrap_sequence(sequence: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut lines = Vec::with_capacity(sequence.len() / width + 1);
    let mut rest = sequence;

    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(width)
            .map(|(index, _)| index)
            .unwrap_or(rest.len());
        let (line, tail) = rest.split_at(split);
        lines.push(line);
        rest = tail;
    }

    lines
}

/// Write one API record as a FASTA entry
pub fn write_record<W: Write>(writer: &mut W, item: &ResultItem) -> std::io::Result<()> {
    writeln!(writer, "{}", FastaHeader::from_item(item))?;
    for line in wrap_sequence(item.sequence(), LINE_WIDTH) {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

/// How header text is turned back into domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Full grammar, every domain
    #[default]
    Grammar,
    /// Historical single-domain reading
    Legacy,
}

/// Decoder for header lines
#[derive(Debug, Clone)]
pub struct HeaderDecoder {
    mode: DecodeMode,
    coordinates: Regex,
}

impl HeaderDecoder {
    pub fn new(mode: DecodeMode) -> Result<Self> {
        let coordinates = Regex::new(LEGACY_COORDINATES)
            .map_err(|e| IprError::Config(format!("Invalid coordinate pattern: {}", e)))?;
        Ok(Self { mode, coordinates })
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decode one header line; a leading `>` and trailing line break are ignored
    pub fn decode(&self, line: &str) -> Result<FastaHeader> {
        let text = line
            .trim_start_matches('>')
            .trim_end_matches(['\r', '\n']);

        match self.mode {
            DecodeMode::Grammar => decode_grammar(text),
            DecodeMode::Legacy => self.decode_legacy(text),
        }
    }

    fn decode_legacy(&self, text: &str) -> Result<FastaHeader> {
        let text = text.trim();
        let id = leading_token(text).ok_or_else(|| IprError::MissingIdentifier(text.to_string()))?;
        let rest = &text[id.len()..];

        if !rest.starts_with(char::is_whitespace) {
            return Err(IprError::NoDomains(text.to_string()));
        }
        let open = rest
            .find('(')
            .ok_or_else(|| IprError::NoDomains(text.to_string()))?;
        let accession = rest[..open].trim();
        if accession.is_empty() {
            return Err(IprError::malformed(text, "empty domain accession"));
        }

        let coordinates = self
            .coordinates
            .captures(text)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| IprError::malformed(text, "no coordinate list"))?;

        let fragments = coordinates
            .as_str()
            .split([FRAGMENT_SEPARATOR, GROUP_SEPARATOR])
            .map(|piece| parse_fragment(text, piece.trim_matches(['(', ')'])))
            .collect::<Result<Vec<_>>>()?;

        Ok(FastaHeader {
            id: id.to_string(),
            domains: Some(vec![DomainSummary::new(accession, vec![fragments])]),
            description: String::new(),
        })
    }
}

/// First run of non-whitespace characters
fn leading_token(text: &str) -> Option<&str> {
    text.split(char::is_whitespace).next().filter(|token| !token.is_empty())
}

fn decode_grammar(text: &str) -> Result<FastaHeader> {
    let mut fields = text.splitn(3, HEADER_SEPARATOR);
    let first = fields.next().unwrap_or_default();
    let id = leading_token(first).ok_or_else(|| IprError::MissingIdentifier(text.to_string()))?;

    // Not a tab-delimited header: identifier followed by free text
    if id.len() != first.len() {
        return Ok(FastaHeader {
            id: id.to_string(),
            domains: None,
            description: text[id.len()..].trim().to_string(),
        });
    }

    let (domains, description) = match (fields.next(), fields.next()) {
        (None, _) => (None, String::new()),
        (Some(description), None) => (None, description.to_string()),
        (Some(summary), Some(description)) => {
            (Some(parse_summary(text, summary)?), description.to_string())
        },
    };

    Ok(FastaHeader {
        id: id.to_string(),
        domains,
        description,
    })
}

fn parse_summary(header: &str, summary: &str) -> Result<Vec<DomainSummary>> {
    let mut domains = Vec::new();
    let mut rest = summary;

    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| IprError::malformed(header, "domain accession without location list"))?;
        let accession = &rest[..open];
        if accession.is_empty() {
            return Err(IprError::malformed(header, "empty domain accession"));
        }

        let close = rest[open..]
            .find(')')
            .map(|offset| open + offset)
            .ok_or_else(|| IprError::malformed(header, "unclosed location list"))?;
        let body = &rest[open + 1..close];

        let locations = if body.is_empty() {
            Vec::new()
        } else {
            body.split(GROUP_SEPARATOR)
                .map(|group| parse_group(header, group))
                .collect::<Result<Vec<_>>>()?
        };
        domains.push(DomainSummary::new(accession, locations));

        rest = &rest[close + 1..];
        if let Some(tail) = rest.strip_prefix(DOMAIN_SEPARATOR) {
            if tail.is_empty() {
                return Err(IprError::malformed(header, "trailing domain separator"));
            }
            rest = tail;
        } else if !rest.is_empty() {
            return Err(IprError::malformed(
                header,
                format!("unexpected text after location list: '{}'", rest),
            ));
        }
    }

    Ok(domains)
}

fn parse_group(header: &str, group: &str) -> Result<Vec<Fragment>> {
    if group.is_empty() {
        return Ok(Vec::new());
    }
    group
        .split(FRAGMENT_SEPARATOR)
        .map(|fragment| parse_fragment(header, fragment))
        .collect()
}

fn parse_fragment(header: &str, fragment: &str) -> Result<Fragment> {
    let invalid = || IprError::InvalidCoordinate {
        header: header.to_string(),
        value: fragment.to_string(),
    };

    let (start, end) = fragment.split_once(RANGE_SEPARATOR).ok_or_else(invalid)?;
    let start = start.parse::<u64>().map_err(|_| invalid())?;
    let end = end.parse::<u64>().map_err(|_| invalid())?;

    Ok(Fragment::new(start, end))
}
