//! Atomic output files
//!
//! Content is written to `tmp__<name>` next to the destination and renamed
//! into place only on [`AtomicOutput::commit`]. A destination path that
//! exists therefore always holds a complete download. An abandoned temporary
//! file is left where it is and truncated by the next attempt.

use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix of in-progress files
pub const TEMP_PREFIX: &str = "tmp__";

/// Temporary sibling used while `path` is being written
pub fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        CliError::config(format!("output path '{}' has no file name", path.display()))
    })?;

    let mut temp_name = std::ffi::OsString::from(TEMP_PREFIX);
    temp_name.push(name);
    Ok(path.with_file_name(temp_name))
}

/// A file being written under a temporary name
#[derive(Debug)]
pub struct AtomicOutput {
    final_path: PathBuf,
    temp_path: PathBuf,
    writer: BufWriter<File>,
}

impl AtomicOutput {
    /// Create (or truncate) the temporary file, creating parent directories
    pub fn create(path: &Path) -> Result<Self> {
        let temp_path = temp_path_for(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&temp_path)?;
        Ok(Self {
            final_path: path.to_path_buf(),
            temp_path,
            writer: BufWriter::new(file),
        })
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and move the file to its final name
    pub fn commit(self) -> Result<PathBuf> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.final_path)?;
        Ok(self.final_path)
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Write `contents` to `path` through a temporary file
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut output = AtomicOutput::create(path)?;
    output.write_all(contents)?;
    output.commit()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path() {
        let temp = temp_path_for(Path::new("downloads/uniprot_IPR1_2.fasta")).unwrap();
        assert_eq!(temp, PathBuf::from("downloads/tmp__uniprot_IPR1_2.fasta"));

        assert!(temp_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_commit_renames() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.fasta");

        let mut output = AtomicOutput::create(&path).unwrap();
        writeln!(output, ">P1\tNAME").unwrap();
        assert!(output.temp_path().exists());
        assert!(!path.exists());

        let committed = output.commit().unwrap();
        assert_eq!(committed, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), ">P1\tNAME\n");
        assert!(!dir.path().join("nested").join("tmp__out.fasta").exists());
    }

    #[test]
    fn test_abandoned_output_keeps_final_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.fasta");

        {
            let mut output = AtomicOutput::create(&path).unwrap();
            writeln!(output, ">partial").unwrap();
        }

        assert!(!path.exists());
        assert!(dir.path().join("tmp__out.fasta").exists());
    }

    #[test]
    fn test_write_atomic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("P1.rdf.xml");
        write_atomic(&path, b"<rdf:RDF/>").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<rdf:RDF/>");
    }
}
