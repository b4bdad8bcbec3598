//! `ipr bed` command implementation
//!
//! Converts the domain annotations of a FASTA file into one BED file per
//! sequence and domain.

use crate::error::{CliError, Completion, Result};
use colored::Colorize;
use ipr_common::bed::{tracks_for_header, BedTrack, DomainSelection, RenameRule};
use ipr_common::fasta::header_lines;
use ipr_common::header::{DecodeMode, HeaderDecoder};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rename table column holding domain accessions
pub const RENAME_FROM_COLUMN: &str = "InterProScan_annotated_region";

/// Rename table column holding short names
pub const RENAME_TO_COLUMN: &str = "Short_PKS_nomenclature";

/// Arguments of `ipr bed`
#[derive(Debug, Clone)]
pub struct BedArgs {
    pub fasta: PathBuf,
    pub output_dir: PathBuf,
    pub selection: DomainSelection,
    pub rename: Option<PathBuf>,
    pub mode: DecodeMode,
}

/// Counts of one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BedSummary {
    pub headers: usize,
    pub failed: usize,
    pub files: usize,
}

/// Load a tab-separated accession → short-name table
pub fn load_rename_table(path: &Path) -> Result<RenameRule> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                CliError::rename_table(path.display().to_string(), format!("missing column '{}'", name))
            })
    };
    let from = column(RENAME_FROM_COLUMN)?;
    let to = column(RENAME_TO_COLUMN)?;

    let mut rule = RenameRule::default();
    for record in reader.records() {
        let record = record?;
        match (record.get(from), record.get(to)) {
            (Some(accession), Some(short_name)) if !accession.trim().is_empty() => {
                rule.insert(accession.trim(), short_name.trim());
            },
            _ => debug!(row = ?record.position().map(|p| p.line()), "Skipping incomplete rename row"),
        }
    }

    debug!(entries = rule.len(), path = %path.display(), "Loaded rename table");
    Ok(rule)
}

/// Convert every header, reporting undecodable ones without stopping
pub fn convert<R: std::io::BufRead>(
    reader: R,
    args: &BedArgs,
    rename: Option<&RenameRule>,
) -> Result<BedSummary> {
    let decoder = HeaderDecoder::new(args.mode)?;
    fs::create_dir_all(&args.output_dir)?;

    let mut summary = BedSummary::default();
    for line in header_lines(reader) {
        let line = line?;
        summary.headers += 1;

        let tracks = decoder
            .decode(&line.text)
            .and_then(|header| tracks_for_header(&header, args.selection, rename));

        match tracks {
            Ok(tracks) => {
                for track in &tracks {
                    write_track(&args.output_dir, track)?;
                }
                summary.files += tracks.len();
            },
            Err(e) if e.is_decode_failure() => {
                summary.failed += 1;
                warn!(line = line.line_number, error = %e, "Skipping header");
            },
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

fn write_track(output_dir: &Path, track: &BedTrack) -> Result<()> {
    let path = output_dir.join(track.file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    track.write_to(&mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), regions = track.regions.len(), "Wrote BED file");
    Ok(())
}

/// Run `ipr bed`
pub fn run(args: BedArgs) -> Result<Completion> {
    let rename = args.rename.as_deref().map(load_rename_table).transpose()?;
    let reader = BufReader::new(File::open(&args.fasta)?);

    let summary = convert(reader, &args, rename.as_ref())?;

    println!(
        "{} Wrote {} BED file(s) from {} header(s) to {}",
        "✓".green(),
        summary.files,
        summary.headers,
        args.output_dir.display()
    );

    if summary.failed > 0 {
        println!(
            "{} {} header(s) could not be converted",
            "✗".red(),
            summary.failed
        );
        return Err(CliError::DecodeFailures {
            failed: summary.failed,
            total: summary.headers,
        });
    }

    Ok(Completion::Done)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn args(dir: &Path, selection: DomainSelection, mode: DecodeMode) -> BedArgs {
        BedArgs {
            fasta: PathBuf::from("unused.fasta"),
            output_dir: dir.to_path_buf(),
            selection,
            rename: None,
            mode,
        }
    }

    const FASTA: &str = "\
>P1\tIPR1(10...20;30...40)-G3DSA:3.10.129.110(50...60)\tFirst
MKVLLA
>P2\tSecond
MA
>P3\tIPR1(2...9)\tThird
MKV
";

    #[test]
    fn test_convert_all_domains() {
        let dir = TempDir::new().unwrap();
        let args = args(dir.path(), DomainSelection::All, DecodeMode::Grammar);

        let summary = convert(Cursor::new(FASTA), &args, None).unwrap();
        assert_eq!(
            summary,
            BedSummary {
                headers: 3,
                failed: 1,
                files: 3
            }
        );

        assert_eq!(
            fs::read_to_string(dir.path().join("P1_IPR1.bed")).unwrap(),
            "P1\t9\t19\tIPR1\nP1\t29\t39\tIPR1\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("P1_G3DSA3.10.129.110.bed")).unwrap(),
            "P1\t49\t59\tG3DSA:3.10.129.110\n"
        );
        assert!(dir.path().join("P3_IPR1.bed").exists());
    }

    #[test]
    fn test_convert_first_domain() {
        let dir = TempDir::new().unwrap();
        let args = args(dir.path(), DomainSelection::First, DecodeMode::Grammar);

        let summary = convert(Cursor::new(FASTA), &args, None).unwrap();
        assert_eq!(summary.files, 2);
        assert!(!dir.path().join("P1_G3DSA3.10.129.110.bed").exists());
    }

    #[test]
    fn test_convert_legacy_mode() {
        let dir = TempDir::new().unwrap();
        let args = args(dir.path(), DomainSelection::All, DecodeMode::Legacy);
        let fasta = ">P1 IPR1(10...20,30...40) Acyl carrier\nMKV\n";

        let summary = convert(Cursor::new(fasta), &args, None).unwrap();
        assert_eq!(summary.failed, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("P1_IPR1.bed")).unwrap(),
            "P1\t9\t19\tIPR1\nP1\t29\t39\tIPR1\n"
        );
    }

    #[test]
    fn test_load_rename_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rename.tsv");
        fs::write(
            &path,
            "InterProScan_annotated_region\tShort_PKS_nomenclature\tNote\nIPR1\tACP\tcarrier\nIPR2\tKS\t\n",
        )
        .unwrap();

        let rule = load_rename_table(&path).unwrap();
        assert_eq!(rule.len(), 2);
        assert_eq!(rule.label("IPR1", 2).unwrap(), "ACP2");
    }

    #[test]
    fn test_rename_table_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rename.tsv");
        fs::write(&path, "accession\tname\nIPR1\tACP\n").unwrap();

        assert!(matches!(
            load_rename_table(&path),
            Err(CliError::RenameTable { .. })
        ));
    }

    #[test]
    fn test_convert_with_rename() {
        let dir = TempDir::new().unwrap();
        let args = args(dir.path(), DomainSelection::All, DecodeMode::Grammar);
        let rule: RenameRule = [("IPR1".to_string(), "ACP".to_string())]
            .into_iter()
            .collect();

        let summary = convert(Cursor::new(FASTA), &args, Some(&rule)).unwrap();
        // P1's G3DSA domain has no rename entry, so P1 fails as a whole
        assert_eq!(summary.failed, 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("P3_IPR1.bed")).unwrap(),
            "P3\t1\t8\tACP1\n"
        );
    }
}
