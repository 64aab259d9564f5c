//! Region Extractor invocation.
//!
//! The actual interval-to-sequence work is delegated to an external tool
//! (`bedtools getfasta` in production). This module owns the process
//! invocation: the command is built as an argument vector, stdout is captured
//! as the FASTA stream, stderr is preserved for error reporting, and a
//! nonzero exit becomes a typed error for the unit.

use crate::errors::CompositionError;
use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Handle on the external extraction tool for one reference sequence.
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    program: PathBuf,
    fasta: PathBuf,
}

impl RegionExtractor {
    pub fn new<P: Into<PathBuf>, F: Into<PathBuf>>(program: P, fasta: F) -> Self {
        Self {
            program: program.into(),
            fasta: fasta.into(),
        }
    }

    /// Extract the strand-aware concatenated sequence of every interval in
    /// `bed`, normalized to a single uppercase line of residues.
    pub fn extract(&self, bed: &Path) -> Result<Vec<u8>> {
        debug!(
            "Extracting {} against {}",
            bed.display(),
            self.fasta.display()
        );
        let output = Command::new(&self.program)
            .arg("getfasta")
            .arg("-s")
            .arg("-fi")
            .arg(&self.fasta)
            .arg("-bed")
            .arg(bed)
            .output()
            .with_context(|| format!("Failed to launch {}", self.program.display()))?;

        if !output.status.success() {
            return Err(CompositionError::ExtractorFailed {
                program: self.program.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(normalize_fasta(&output.stdout))
    }
}

/// Flatten a FASTA stream into the raw sequence: header lines dropped,
/// newlines removed, residues uppercased.
pub fn normalize_fasta(raw: &[u8]) -> Vec<u8> {
    let mut seq = Vec::with_capacity(raw.len());
    for line in raw.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.first() == Some(&b'>') {
            continue;
        }
        seq.extend(line.iter().map(u8::to_ascii_uppercase));
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn normalize_drops_headers_joins_lines_and_uppercases() {
        let raw = b">chrI:10-18(+)\nacgtACGT\n>chrII:5-9(-)\nnnta\n";
        assert_eq!(normalize_fasta(raw), b"ACGTACGTNNTA");
    }

    #[test]
    fn normalize_handles_crlf_and_missing_trailing_newline() {
        let raw = b">r1\r\nacgt\r\n>r2\r\ntt";
        assert_eq!(normalize_fasta(raw), b"ACGTTT");
    }

    #[test]
    fn normalize_of_headers_only_is_empty() {
        assert_eq!(normalize_fasta(b">only\n>headers\n"), b"");
    }

    /// Write an executable stub standing in for the external tool.
    fn stub_extractor(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("extractor.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn successful_extraction_returns_normalized_sequence() {
        let dir = TempDir::new().unwrap();
        let program = stub_extractor(
            &dir,
            "printf '>chrI:0-4(+)\\nacgt\\n>chrI:8-12(-)\\ngGtA\\n'",
        );
        let extractor = RegionExtractor::new(&program, "ref.fa");
        let seq = extractor.extract(Path::new("sites.bed")).unwrap();
        assert_eq!(seq, b"ACGTGGTA");
    }

    #[test]
    fn nonzero_exit_carries_status_and_stderr() {
        let dir = TempDir::new().unwrap();
        let program = stub_extractor(&dir, "echo 'index not found' >&2; exit 3");
        let extractor = RegionExtractor::new(&program, "ref.fa");
        let err = extractor.extract(Path::new("sites.bed")).unwrap_err();
        match err.downcast::<CompositionError>().unwrap() {
            CompositionError::ExtractorFailed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "index not found");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let extractor = RegionExtractor::new("/nonexistent/bedtools", "ref.fa");
        let err = extractor.extract(Path::new("sites.bed")).unwrap_err();
        assert!(err.to_string().contains("Failed to launch"));
    }
}
