//! `ipr mnemonics` command implementation
//!
//! Lists `<accession>\t<mnemonic>` pairs from downloaded UniProt RDF/XML
//! entries, ready to be edited into a rename table.

use crate::commands::rdf::RDF_SUFFIX;
use crate::error::{CliError, Completion, Result};
use crate::fetch::output::TEMP_PREFIX;
use crate::rdfxml::{literal_triples, LiteralTriple};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Predicate local names containing this are reported
pub const MNEMONIC_PREDICATE: &str = "mnemonic";

/// Arguments of `ipr mnemonics`
#[derive(Debug, Clone)]
pub struct MnemonicsArgs {
    pub dir: PathBuf,
    /// Write here instead of stdout
    pub output: Option<PathBuf>,
}

/// RDF/XML entries directly inside `dir`, sorted by file name
pub fn rdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        let is_rdf = entry
            .file_name()
            .to_str()
            .is_some_and(|name| {
                name.ends_with(RDF_SUFFIX.trim_start_matches('.')) && !name.starts_with(TEMP_PREFIX)
            });
        if is_rdf && entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Mnemonic triples of one file
pub fn mnemonics_in(path: &Path) -> Result<Vec<LiteralTriple>> {
    let content = fs::read_to_string(path)?;
    literal_triples(&content, |predicate| predicate.contains(MNEMONIC_PREDICATE))
        .map_err(|e| CliError::xml(path.display().to_string(), e))
}

/// Write every pair found under `dir` as tab-separated rows
pub fn write_mnemonics<W: Write>(dir: &Path, writer: W) -> Result<usize> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    let mut rows = 0;
    for path in rdf_files(dir)? {
        let triples = mnemonics_in(&path)?;
        debug!(path = %path.display(), count = triples.len(), "Read RDF entry");

        for triple in &triples {
            tsv.write_record([triple.subject_tail(), triple.value.as_str()])?;
            rows += 1;
        }
    }

    tsv.flush()?;
    Ok(rows)
}

/// Run `ipr mnemonics`
pub fn run(args: MnemonicsArgs) -> Result<Completion> {
    let rows = match &args.output {
        Some(path) => write_mnemonics(&args.dir, File::create(path)?)?,
        None => write_mnemonics(&args.dir, io::stdout().lock())?,
    };

    // stdout may be the data stream
    eprintln!("Found {} mnemonic(s) in {}", rows, args.dir.display());
    Ok(Completion::Done)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(accession: &str, mnemonic: &str) -> String {
        format!(
            r#"<rdf:RDF xmlns="http://purl.uniprot.org/core/" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about="http://purl.uniprot.org/uniprot/{accession}">
    <mnemonic>{mnemonic}</mnemonic>
  </rdf:Description>
</rdf:RDF>"#
        )
    }

    #[test]
    fn test_rdf_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("P2.rdf.xml"), entry("P2", "B_ECOLI")).unwrap();
        fs::write(dir.path().join("P1.rdf.xml"), entry("P1", "A_ECOLI")).unwrap();
        fs::write(dir.path().join("tmp__P3.rdf.xml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.rdf.xml")).unwrap();

        let names: Vec<_> = rdf_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["P1.rdf.xml", "P2.rdf.xml"]);
    }

    #[test]
    fn test_write_mnemonics() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("P2.rdf.xml"), entry("P2", "B_ECOLI")).unwrap();
        fs::write(dir.path().join("P1.rdf.xml"), entry("P1", "A_ECOLI")).unwrap();

        let mut out = Vec::new();
        let rows = write_mnemonics(dir.path(), &mut out).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "P1\tA_ECOLI\nP2\tB_ECOLI\n"
        );
    }

    #[test]
    fn test_invalid_xml_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.rdf.xml"), "<rdf:RDF><a></b></rdf:RDF>").unwrap();

        let err = write_mnemonics(dir.path(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("bad.rdf.xml"));
    }
}
