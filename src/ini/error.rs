//! Error types for editing, loading and saving documents

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`Document`](crate::ini::Document) edits and I/O.
///
/// Classification never fails, so there is no parse variant: malformed lines are kept as
/// opaque comments instead. Edits fail only when the line they would write could not be
/// read back as the same declaration.
#[derive(Debug, Error)]
pub enum IniError {
    /// The source file is missing or could not be read.
    #[error("cannot read ini file {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or replacing the destination file failed. The destination is left as it was.
    #[error("cannot write ini file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key is not a declaration key (`[A-Za-z_][A-Za-z0-9_.-[]]*`).
    #[error("invalid setting key {key:?}")]
    InvalidKey { key: String },

    /// The value would not read back unchanged: it spans lines, has surrounding whitespace,
    /// an unquoted `;` or unbalanced double quotes.
    #[error("value {value:?} for {key:?} cannot be written on a single ini line")]
    InvalidValue { key: String, value: String },

    /// `save()` was called on a document that was not loaded from a file.
    #[error("document has no source path; use save_to() instead")]
    NoSourcePath,
}

/// Result alias for document edits and I/O.
pub type IniResult<T> = Result<T, IniError>;
