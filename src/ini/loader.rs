//! Building documents from files and strings
//!
//! Splitting keeps each line's own terminator (`\n`, `\r\n`, or nothing for an unterminated
//! last line), so files with CRLF or mixed line endings render back unchanged.
//!
//! Files are read as bytes. Lines that are not valid UTF-8 are still classified, from a lossy
//! decoding, and keep their bytes for [`Document::to_bytes`].

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use super::document::Document;
use super::error::{IniError, IniResult};
use super::line::{LineEnding, LineRecord};
use crate::config::FormatConfig;

impl Document {
    /// Load and parse a file using the default format configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> IniResult<Self> {
        Self::load_with(path, FormatConfig::default())
    }

    /// Load and parse a file.
    ///
    /// # Errors
    ///
    /// [`IniError::NotFound`] when the file is missing or unreadable. Content is never
    /// rejected, whatever its encoding.
    pub fn load_with<P: AsRef<Path>>(path: P, format: FormatConfig) -> IniResult<Self> {
        let path = path.as_ref();
        let source = fs::read(path).map_err(|source| IniError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let document = build(&source, format, Some(path.to_path_buf()));
        info!(path = %path.display(), lines = document.len(), "loaded ini file");
        Ok(document)
    }

    /// Parse text using the default format configuration. Never fails.
    pub fn parse(source: &str) -> Self {
        Self::parse_with(source, FormatConfig::default())
    }

    /// Parse text. Never fails: unrecognized lines become opaque comments.
    pub fn parse_with(source: &str, format: FormatConfig) -> Self {
        build(source.as_bytes(), format, None)
    }

    /// Parse raw file content, which need not be valid UTF-8.
    pub fn parse_bytes(source: &[u8]) -> Self {
        Self::parse_bytes_with(source, FormatConfig::default())
    }

    pub fn parse_bytes_with(source: &[u8], format: FormatConfig) -> Self {
        build(source, format, None)
    }
}

fn build(source: &[u8], format: FormatConfig, path: Option<PathBuf>) -> Document {
    let lines = split_lines(source);
    let detected = lines
        .iter()
        .map(|(_, ending)| *ending)
        .find(|ending| *ending != LineEnding::None);
    let line_ending = format.line_ending.resolve(detected);

    let records: Vec<LineRecord> = lines
        .into_iter()
        .enumerate()
        .map(|(index, (text, ending))| LineRecord::from_source(text, ending, index))
        .collect();
    debug!(lines = records.len(), ?line_ending, "parsed ini source");

    Document::from_records(records, line_ending, format, path)
}

impl FromStr for Document {
    type Err = std::convert::Infallible;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Ok(Document::parse(source))
    }
}

/// Split source bytes into physical lines and their terminators.
pub fn split_lines(source: &[u8]) -> Vec<(&[u8], LineEnding)> {
    source
        .split_inclusive(|byte| *byte == b'\n')
        .map(|piece| {
            if let Some(text) = piece.strip_suffix(b"\r\n") {
                (text, LineEnding::CrLf)
            } else if let Some(text) = piece.strip_suffix(b"\n") {
                (text, LineEnding::Lf)
            } else {
                (piece, LineEnding::None)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEndingPolicy;
    use crate::ini::line::LineKind;

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(
            split_lines(b"a\r\nb\nc"),
            vec![
                (&b"a"[..], LineEnding::CrLf),
                (&b"b"[..], LineEnding::Lf),
                (&b"c"[..], LineEnding::None)
            ]
        );
        assert!(split_lines(b"").is_empty());
        assert_eq!(split_lines(b"\n"), vec![(&b""[..], LineEnding::Lf)]);
    }

    #[test]
    fn test_parse_classifies_each_line() {
        let doc = Document::parse("[PHP]\n\n; note\nengine = On\n;extension=gd\n");
        let kinds: Vec<LineKind> = doc.records().iter().map(LineRecord::kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::SectionHeader,
                LineKind::Blank,
                LineKind::Comment,
                LineKind::Setting,
                LineKind::ExtensionEntry,
            ]
        );
    }

    #[test]
    fn test_line_ending_detection() {
        assert_eq!(Document::parse("a = 1\r\nb = 2\n").line_ending(), LineEnding::CrLf);
        assert_eq!(Document::parse("a = 1").line_ending(), LineEnding::Lf);

        let format = FormatConfig {
            line_ending: LineEndingPolicy::Crlf,
            ..FormatConfig::default()
        };
        assert_eq!(Document::parse_with("a = 1\n", format).line_ending(), LineEnding::CrLf);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = Document::load("/definitely/not/here/php.ini").unwrap_err();
        assert!(matches!(err, IniError::NotFound { .. }));
    }

    #[test]
    fn test_load_remembers_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("php.ini");
        fs::write(&path, "memory_limit = 128M\n").expect("write");

        let doc = Document::load(&path).expect("load");
        assert_eq!(doc.path(), Some(path.as_path()));
        assert_eq!(doc.get("memory_limit", ""), "128M");
    }

    #[test]
    fn test_load_accepts_latin1_bytes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("php.ini");
        let source = b"; caf\xe9\nmemory_limit = 1024M\n";
        fs::write(&path, source).expect("write");

        let doc = Document::load(&path).expect("load");
        assert_eq!(doc.get("memory_limit", ""), "1024M");
        assert_eq!(doc.records()[0].kind(), LineKind::Comment);
        assert_eq!(doc.to_bytes(), source);
    }

    #[test]
    fn test_from_str() {
        let doc: Document = "a = 1\n".parse().expect("infallible");
        assert_eq!(doc.len(), 1);
    }
}
