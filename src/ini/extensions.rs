//! Extension manager
//!
//! `extension = name` is a repeated declaration rather than a single key: a php.ini usually
//! lists every bundled extension, most of them commented out. Enabling and disabling toggles
//! the comment marker of those lines in place so their position never changes.
//!
//! Enable order of preference:
//!
//!     1. an active entry for the name already exists: nothing to do
//!     2. the first commented entry for the name is uncommented
//!     3. a new entry is inserted right after the last extension line, or at the end of the
//!        document when there is none
//!
//! Names go through the same value check as settings and must not be empty.

use std::collections::HashSet;
use std::iter::FusedIterator;
use std::slice;

use tracing::debug;

use super::classification::is_valid_value;
use super::document::{Document, Resolved};
use super::error::{IniError, IniResult};
use super::line::{Entry, Layout, LineKind, LineRecord, EXTENSION_KEY};

impl Document {
    /// Enable an extension. Idempotent.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidValue`] when `name` is empty or could not be read back from an
    /// `extension=` line. Nothing is changed in that case.
    pub fn enable_extension(&mut self, name: &str) -> IniResult<()> {
        if name.is_empty() || !is_valid_value(name) {
            return Err(IniError::InvalidValue {
                key: EXTENSION_KEY.to_string(),
                value: name.to_string(),
            });
        }
        match self.resolve_extension(name) {
            Some(Resolved::Active(_)) => {}
            Some(Resolved::Commented(index)) => {
                let marker = self.format().comment_marker.clone();
                self.record_mut(index)
                    .edit_entry(|entry| entry.set_commented(false, &marker));
                debug!(extension = name, line = index + 1, "enabled extension");
            }
            None => {
                let position = self
                    .position_after_last(LineKind::ExtensionEntry)
                    .unwrap_or(self.len());
                let layout = Layout::with_separator(&self.format().extension_separator);
                let entry = Entry::new(EXTENSION_KEY, name, false, layout);
                let index = self.insert_entry(position, entry);
                debug!(extension = name, line = index + 1, "added extension");
            }
        }
        Ok(())
    }

    /// Disable an extension by commenting out every active entry for it, in place.
    ///
    /// No-op when the extension is absent or already disabled.
    pub fn disable_extension(&mut self, name: &str) {
        let marker = self.format().comment_marker.clone();
        let active: Vec<usize> = self
            .extension_entries()
            .filter(|(_, entry)| entry.is_active() && entry.unquoted_value() == name)
            .map(|(index, _)| index)
            .collect();
        for index in active {
            self.record_mut(index)
                .edit_entry(|entry| entry.set_commented(true, &marker));
            debug!(extension = name, line = index + 1, "disabled extension");
        }
    }

    pub fn is_extension_enabled(&self, name: &str) -> bool {
        matches!(self.resolve_extension(name), Some(Resolved::Active(_)))
    }

    /// Names of the active extension entries in document order.
    ///
    /// Duplicates are reported as many times as they are declared. The iterator is lazy and
    /// can be cloned to restart it.
    pub fn enabled_extensions(&self) -> EnabledExtensions<'_> {
        EnabledExtensions {
            records: self.records().iter(),
        }
    }

    /// Names that only appear commented out, in first-seen order, without duplicates.
    pub fn disabled_extensions(&self) -> Vec<&str> {
        let enabled: HashSet<&str> = self.enabled_extensions().collect();
        let mut seen = HashSet::new();
        self.extension_entries()
            .filter(|(_, entry)| entry.is_commented())
            .map(|(_, entry)| entry.unquoted_value())
            .filter(|name| !enabled.contains(name) && seen.insert(*name))
            .collect()
    }

    fn extension_entries(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.entries()
            .filter(|(index, _)| self.records()[*index].kind() == LineKind::ExtensionEntry)
    }

    fn resolve_extension(&self, name: &str) -> Option<Resolved> {
        self.resolve_by(|entry| entry.key() == EXTENSION_KEY && entry.unquoted_value() == name)
    }
}

/// Iterator over enabled extension names, see [`Document::enabled_extensions`].
#[derive(Debug, Clone)]
pub struct EnabledExtensions<'a> {
    records: slice::Iter<'a, LineRecord>,
}

impl<'a> Iterator for EnabledExtensions<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.by_ref().find_map(|record| match record.entry() {
            Some(entry) if record.kind() == LineKind::ExtensionEntry && entry.is_active() => {
                Some(entry.unquoted_value())
            }
            _ => None,
        })
    }
}

impl FusedIterator for EnabledExtensions<'_> {}
