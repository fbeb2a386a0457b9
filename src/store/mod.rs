//! Line store for CAPL files.
//!
//! [`CaplFileStore`] owns the raw line sequence of exactly one file for its
//! lifetime. CAPL tooling on Windows writes cp1252, so the store decodes and
//! encodes through that fixed legacy code page rather than UTF-8. Lines keep
//! their original terminators (LF or CRLF), which is what makes saving an
//! unmodified line byte-identical.
//!
//! The line sequence is the single mutable entity in the crate: the
//! processor splices new lines into it, and any scan result computed before
//! a mutation is stale afterwards.

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

use crate::error::CaplError;

/// Handles low-level file operations for CAPL files: reading, line-range
/// access, in-memory mutation, and writing back.
#[derive(Debug)]
pub struct CaplFileStore {
    path: PathBuf,
    lines: Vec<String>,
}

impl CaplFileStore {
    /// Read a CAPL file into memory.
    ///
    /// # Errors
    ///
    /// Returns [`CaplError::MissingFile`] if the path does not exist and
    /// [`CaplError::FileRead`] if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CaplError> {
        let path = path.into();
        if !path.exists() {
            return Err(CaplError::MissingFile(path));
        }

        let bytes = std::fs::read(&path).map_err(|e| CaplError::file_read(&path, e))?;
        let (text, _, _) = WINDOWS_1252.decode(&bytes);
        let lines = split_keeping_terminators(&text);

        tracing::debug!("Read {} lines from {}", lines.len(), path.display());
        Ok(Self { path, lines })
    }

    /// Build a store from already-split lines. Used by tests and callers
    /// that assemble content in memory; `save` will write to `path`.
    pub fn from_lines(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// The file this store reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the full line sequence.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines currently held.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Borrow the half-open line range `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`CaplError::InvalidRange`] if the range is empty or reaches
    /// past the end of the file.
    pub fn get_lines(&self, start: usize, end: usize) -> Result<&[String], CaplError> {
        if end > self.lines.len() || start >= end {
            return Err(CaplError::InvalidRange { start, end });
        }
        Ok(&self.lines[start..end])
    }

    /// Splice `new_lines` into the sequence so the first of them lands at
    /// index `at`; every line from `at` onward shifts down. In-memory only —
    /// nothing touches the file until [`save`](Self::save).
    pub fn insert_lines(&mut self, at: usize, new_lines: Vec<String>) {
        debug_assert!(at <= self.lines.len(), "insertion index {at} out of bounds");
        self.lines.splice(at..at, new_lines);
    }

    /// Write the current line sequence back to the file as cp1252.
    ///
    /// # Errors
    ///
    /// Returns [`CaplError::FileWrite`] if the file cannot be written.
    pub fn save(&self) -> Result<(), CaplError> {
        let text: String = self.lines.concat();
        let (bytes, _, _) = WINDOWS_1252.encode(&text);
        std::fs::write(&self.path, &bytes).map_err(|e| CaplError::file_write(&self.path, e))?;

        tracing::debug!("Wrote {} lines to {}", self.lines.len(), self.path.display());
        Ok(())
    }
}

/// Split text into lines, each keeping its own terminator. A final line
/// without a terminator is kept as-is; CRLF stays intact because the `\r`
/// precedes the `\n` it splits on.
fn split_keeping_terminators(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(lines: &[&str]) -> CaplFileStore {
        CaplFileStore::from_lines("test.can", lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_split_keeps_mixed_terminators() {
        let lines = split_keeping_terminators("a\r\nb\nc");
        assert_eq!(lines, vec!["a\r\n", "b\n", "c"]);
    }

    #[test]
    fn test_get_lines_valid_range() {
        let store = store_with(&["one\n", "two\n", "three\n"]);
        let slice = store.get_lines(1, 3).unwrap();
        assert_eq!(slice, &["two\n", "three\n"]);
    }

    #[test]
    fn test_get_lines_rejects_bad_ranges() {
        let store = store_with(&["one\n", "two\n"]);
        assert!(matches!(
            store.get_lines(0, 3),
            Err(CaplError::InvalidRange { start: 0, end: 3 })
        ));
        assert!(matches!(
            store.get_lines(1, 1),
            Err(CaplError::InvalidRange { .. })
        ));
        assert!(matches!(
            store.get_lines(2, 1),
            Err(CaplError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_insert_lines_shifts_following() {
        let mut store = store_with(&["a\n", "b\n"]);
        store.insert_lines(1, vec!["x\n".to_string(), "y\n".to_string()]);
        assert_eq!(store.lines(), &["a\n", "x\n", "y\n", "b\n"]);
    }

    #[test]
    fn test_open_missing_file() {
        let result = CaplFileStore::open("does_not_exist.can");
        assert!(matches!(result, Err(CaplError::MissingFile(_))));
    }

    #[test]
    fn test_cp1252_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlaut.can");
        // 0xE4 is 'ä' in cp1252; invalid as UTF-8 on its own.
        std::fs::write(&path, b"// Pr\xE4fix\nvariables {\n}\n").unwrap();

        let store = CaplFileStore::open(&path).unwrap();
        assert_eq!(store.lines()[0], "// Pr\u{e4}fix\n");

        store.save().unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..], b"// Pr\xE4fix\nvariables {\n}\n");
    }
}
