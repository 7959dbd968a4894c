//! Serializer
//!
//! Renders records back to text and saves documents.
//!
//! Newline policy: each record is followed by the terminator it was read with. A document
//! saved without edits is therefore byte-identical to its source, including CRLF lines and a
//! missing final newline. Added lines use the document terminator (see
//! [`Document::line_ending`]). Files are written from [`Document::to_bytes`], which keeps the
//! source bytes of unedited lines that were not valid UTF-8.
//!
//! Saving writes to a temporary file next to the destination, syncs it and renames it over
//! the destination, so a failed save never leaves a partially written file behind.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use super::document::Document;
use super::error::{IniError, IniResult};

impl Document {
    /// Render the whole document as text. Same as `to_string()`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Render the whole document as the bytes [`Document::save_to`] writes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for record in self.records() {
            out.extend_from_slice(&record.to_bytes());
            out.extend_from_slice(record.ending().as_str().as_bytes());
        }
        out
    }

    /// Atomically write the rendered document to `path`.
    ///
    /// # Errors
    ///
    /// [`IniError::Io`] when the temporary file cannot be created or written, or the rename
    /// fails. The destination is left untouched in that case.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> IniResult<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes();
        replace_file(path, |file| file.write_all(&bytes))?;

        info!(
            path = %path.display(),
            lines = self.len(),
            changes = self.changes().len(),
            "saved ini file"
        );
        Ok(())
    }

    /// Save back to the file the document was loaded from.
    pub fn save(&self) -> IniResult<()> {
        let path = self.path().ok_or(IniError::NoSourcePath)?;
        self.save_to(path)
    }
}

/// Replace `path` with what `write` puts into a temporary file in the same directory.
///
/// The destination is only touched by the final rename. On any error the temporary file is
/// removed when it drops.
fn replace_file<F>(path: &Path, write: F) -> IniResult<()>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let io_error = |source| IniError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        file.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_error)?;
    }
    write(&mut file).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.records() {
            write!(f, "{}{}", record.text(), record.ending().as_str())?;
        }
        Ok(())
    }
}
