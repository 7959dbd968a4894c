//! The document: an ordered arena of line records
//!
//!     Records are stored in file order and addressed by index. The order is significant:
//!     it is what a textual diff of the saved file observes, so edits happen in place and new
//!     lines are inserted at well-defined positions rather than regrouped.
//!
//! Key Resolution
//!
//!     Keys may repeat. A lookup resolves to the last active record for the key, the usual INI
//!     override rule. When no record is active, the first commented record is the one that a
//!     `set` or an `enable` brings back.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::line::{Entry, LineEnding, LineKind, LineRecord};
use crate::config::FormatConfig;

/// Outcome of resolving a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved {
    /// Index of the last active match
    Active(usize),
    /// Index of the first commented match (no active match exists)
    Commented(usize),
}

/// How a line differs from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
}

/// One changed line, as a diff against the source would report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineChange {
    pub kind: ChangeKind,
    /// 1-based line number in the current document
    pub line: usize,
    /// Text read from the source; `None` for added lines
    pub before: Option<String>,
    pub after: String,
}

/// An editable php.ini document.
#[derive(Debug, Clone)]
pub struct Document {
    records: Vec<LineRecord>,
    line_ending: LineEnding,
    format: FormatConfig,
    path: Option<PathBuf>,
}

impl Document {
    pub(crate) fn from_records(
        records: Vec<LineRecord>,
        line_ending: LineEnding,
        format: FormatConfig,
        path: Option<PathBuf>,
    ) -> Self {
        Document {
            records,
            line_ending,
            format,
            path,
        }
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&LineRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Terminator used for lines added to this document.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn format(&self) -> &FormatConfig {
        &self.format
    }

    /// Path the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Section names in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().filter_map(LineRecord::section_name)
    }

    /// Every line whose rendered text differs from the source, in document order.
    pub fn changes(&self) -> Vec<LineChange> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_changed())
            .map(|(index, record)| LineChange {
                kind: if record.is_inserted() {
                    ChangeKind::Added
                } else {
                    ChangeKind::Modified
                },
                line: index + 1,
                before: (!record.is_inserted()).then(|| record.raw().to_string()),
                after: record.text().into_owned(),
            })
            .collect()
    }

    pub fn is_modified(&self) -> bool {
        self.records.iter().any(LineRecord::is_changed)
    }

    /// Resolve the declaration records matching `matches`.
    pub(crate) fn resolve_by<F>(&self, matches: F) -> Option<Resolved>
    where
        F: Fn(&Entry) -> bool,
    {
        let mut first_commented = None;
        let mut last_active = None;
        for (index, entry) in self.entries() {
            if !matches(entry) {
                continue;
            }
            if entry.is_active() {
                last_active = Some(index);
            } else if first_commented.is_none() {
                first_commented = Some(index);
            }
        }
        last_active
            .map(Resolved::Active)
            .or(first_commented.map(Resolved::Commented))
    }

    /// Declarations with their record index.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| record.entry().map(|entry| (index, entry)))
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> &mut LineRecord {
        &mut self.records[index]
    }

    /// Index just past the last record of the given kind.
    pub(crate) fn position_after_last(&self, kind: LineKind) -> Option<usize> {
        self.records
            .iter()
            .rposition(|record| record.kind() == kind)
            .map(|index| index + 1)
    }

    /// Insert a new declaration at `index`, returning its position.
    ///
    /// Appending after an unterminated last line gives that line the document terminator and
    /// moves the missing terminator to the new line, so whether the file ends with a newline
    /// does not change.
    pub(crate) fn insert_entry(&mut self, index: usize, entry: Entry) -> usize {
        let index = index.min(self.records.len());
        let mut ending = self.line_ending;
        if index == self.records.len() {
            if let Some(last) = self.records.last_mut() {
                if last.ending() == LineEnding::None {
                    last.set_ending(self.line_ending);
                    ending = LineEnding::None;
                }
            }
        }
        self.records.insert(index, LineRecord::inserted(entry, ending));
        index
    }
}
