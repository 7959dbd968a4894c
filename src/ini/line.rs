//! Line records
//!
//!     A document is a flat list of line records, one per physical line of the source file.
//!     Each record keeps the exact text it was read from (without the terminator) and the
//!     terminator itself, so an untouched record always renders back byte for byte.
//!
//!     Lines that are not valid UTF-8 (a Latin-1 comment in a Windows php.ini, say) are
//!     classified from a lossy decoding, and the record also keeps the bytes it was read
//!     from. Unedited, such a record writes those bytes back; edited, it is written as UTF-8.
//!
//!     Records that hold a declaration (a setting or an extension entry) also keep the parsed
//!     key and value and the layout of the original line: indentation, the comment marker run
//!     for disabled declarations, the spacing around `=`, and anything after the value such as
//!     an inline `; comment`. Once such a record is edited it stops echoing its raw text and is
//!     regenerated from those parts, which keeps an edited line as close to the original as
//!     possible.
//!
//! Line Kinds
//!
//!         - Blank: empty or whitespace only
//!         - Comment: `;` text that is not a disabled declaration, or any unrecognized line
//!         - SectionHeader: `[name]`
//!         - Setting: `key = value`, optionally commented out
//!         - ExtensionEntry: `extension = name`, optionally commented out

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use super::classification::classify_line;

/// The key that turns a declaration into an extension entry.
pub const EXTENSION_KEY: &str = "extension";

/// The classification of a line record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,

    /// Free comment text, or a line that matched nothing else
    Comment,

    /// `[section]`
    SectionHeader,

    /// `key = value`, active or commented
    Setting,

    /// `extension = name`, active or commented
    ExtensionEntry,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Blank => "BLANK",
            LineKind::Comment => "COMMENT",
            LineKind::SectionHeader => "SECTION_HEADER",
            LineKind::Setting => "SETTING",
            LineKind::ExtensionEntry => "EXTENSION_ENTRY",
        };
        write!(f, "{}", name)
    }
}

/// Line terminator of a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Last line of a file that does not end with a newline
    None,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// Layout of a declaration line, captured at classification time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Layout {
    pub(crate) indent: String,
    /// Comment marker run including the whitespace after it, e.g. `"; "`
    pub(crate) marker: String,
    /// Everything between the key and the value, e.g. `" = "`
    pub(crate) separator: String,
    /// Whitespace and inline comment after the value
    pub(crate) trailing: String,
}

impl Layout {
    pub(crate) fn with_separator(separator: &str) -> Self {
        Layout {
            separator: separator.to_string(),
            ..Layout::default()
        }
    }
}

/// A `key = value` declaration, active or commented out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    value: String,
    commented: bool,
    layout: Layout,
}

impl Entry {
    pub(crate) fn new(key: &str, value: &str, commented: bool, layout: Layout) -> Self {
        Entry {
            key: key.to_string(),
            value: value.to_string(),
            commented,
            layout,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_commented(&self) -> bool {
        self.commented
    }

    pub fn is_active(&self) -> bool {
        !self.commented
    }

    /// The value with one pair of surrounding double quotes removed.
    ///
    /// `extension="mbstring"` and `extension=mbstring` declare the same extension.
    pub fn unquoted_value(&self) -> &str {
        self.value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(&self.value)
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        // `;date.timezone =` has no room after the `=`; mirror the spacing before it.
        if self.value.is_empty() && self.layout.separator.ends_with('=') {
            let before = self.layout.separator.trim_end_matches('=').to_string();
            self.layout.separator.push_str(&before);
        }
        self.value = value.to_string();
    }

    /// Toggle the comment state. `marker` is used only when the line never had one.
    pub(crate) fn set_commented(&mut self, commented: bool, marker: &str) {
        if commented && self.layout.marker.is_empty() {
            self.layout.marker = marker.to_string();
        }
        self.commented = commented;
    }

    /// Regenerate the line text from the declaration parts.
    pub fn to_line(&self) -> String {
        let layout = &self.layout;
        let marker = if self.commented {
            layout.marker.as_str()
        } else {
            ""
        };
        format!(
            "{}{}{}{}{}{}",
            layout.indent, marker, self.key, layout.separator, self.value, layout.trailing
        )
    }
}

/// Parsed content of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Blank,
    Comment,
    Section(String),
    Setting(Entry),
    Extension(Entry),
}

impl LineContent {
    /// Wrap a declaration, choosing the extension variant for the `extension` key.
    pub(crate) fn declaration(entry: Entry) -> Self {
        if entry.key() == EXTENSION_KEY {
            LineContent::Extension(entry)
        } else {
            LineContent::Setting(entry)
        }
    }

    pub fn kind(&self) -> LineKind {
        match self {
            LineContent::Blank => LineKind::Blank,
            LineContent::Comment => LineKind::Comment,
            LineContent::Section(_) => LineKind::SectionHeader,
            LineContent::Setting(_) => LineKind::Setting,
            LineContent::Extension(_) => LineKind::ExtensionEntry,
        }
    }

    pub fn entry(&self) -> Option<&Entry> {
        match self {
            LineContent::Setting(entry) | LineContent::Extension(entry) => Some(entry),
            _ => None,
        }
    }

    fn entry_mut(&mut self) -> Option<&mut Entry> {
        match self {
            LineContent::Setting(entry) | LineContent::Extension(entry) => Some(entry),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Read from the source at this 0-based line index, with this terminator
    Source { index: usize, ending: LineEnding },
    Inserted,
}

/// One physical line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    content: LineContent,
    raw: String,
    /// Source bytes, kept only when they were not valid UTF-8
    bytes: Option<Vec<u8>>,
    ending: LineEnding,
    origin: Origin,
    dirty: bool,
}

impl LineRecord {
    /// Build a record for a line read from source bytes.
    pub(crate) fn from_source(source: &[u8], ending: LineEnding, index: usize) -> Self {
        let (raw, bytes) = match String::from_utf8_lossy(source) {
            Cow::Borrowed(text) => (text.to_string(), None),
            Cow::Owned(text) => (text, Some(source.to_vec())),
        };
        LineRecord {
            content: classify_line(&raw),
            raw,
            bytes,
            ending,
            origin: Origin::Source { index, ending },
            dirty: false,
        }
    }

    /// Build a record that did not exist in the source.
    pub(crate) fn inserted(entry: Entry, ending: LineEnding) -> Self {
        LineRecord {
            content: LineContent::declaration(entry),
            raw: String::new(),
            bytes: None,
            ending,
            origin: Origin::Inserted,
            dirty: true,
        }
    }

    pub fn kind(&self) -> LineKind {
        self.content.kind()
    }

    pub fn content(&self) -> &LineContent {
        &self.content
    }

    pub fn entry(&self) -> Option<&Entry> {
        self.content.entry()
    }

    pub fn key(&self) -> Option<&str> {
        self.entry().map(Entry::key)
    }

    pub fn value(&self) -> Option<&str> {
        self.entry().map(Entry::value)
    }

    /// True for disabled declarations. Plain comments are not "commented" declarations.
    pub fn is_commented(&self) -> bool {
        self.entry().is_some_and(Entry::is_commented)
    }

    pub fn section_name(&self) -> Option<&str> {
        match &self.content {
            LineContent::Section(name) => Some(name),
            _ => None,
        }
    }

    /// The text the line was read with, without terminator. Empty for inserted records.
    ///
    /// Invalid UTF-8 shows up here as U+FFFD; see [`LineRecord::to_bytes`].
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn ending(&self) -> LineEnding {
        self.ending
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_inserted(&self) -> bool {
        self.origin == Origin::Inserted
    }

    /// 1-based line number in the source file, if the record came from it.
    pub fn source_line(&self) -> Option<usize> {
        match self.origin {
            Origin::Source { index, .. } => Some(index + 1),
            Origin::Inserted => None,
        }
    }

    /// Current text of the line, without terminator.
    pub fn text(&self) -> Cow<'_, str> {
        if !self.dirty {
            return Cow::Borrowed(&self.raw);
        }
        match self.content.entry() {
            Some(entry) => Cow::Owned(entry.to_line()),
            None => Cow::Borrowed(&self.raw),
        }
    }

    /// Bytes of the line, without terminator.
    ///
    /// The source bytes while the text is unchanged, the UTF-8 text otherwise.
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        let text = self.text();
        match &self.bytes {
            Some(bytes) if text == self.raw.as_str() => Cow::Borrowed(bytes.as_slice()),
            _ => match text {
                Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
                Cow::Owned(text) => Cow::Owned(text.into_bytes()),
            },
        }
    }

    /// Whether rendering this record yields something other than what was read.
    ///
    /// A record can be dirty without being changed, e.g. after enable then disable.
    pub fn is_changed(&self) -> bool {
        match self.origin {
            Origin::Inserted => true,
            Origin::Source { ending, .. } => {
                self.dirty && (self.text() != self.raw.as_str() || self.ending != ending)
            }
        }
    }

    /// Mutate the declaration held by this record, marking it dirty.
    pub(crate) fn edit_entry<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Entry),
    {
        if let Some(entry) = self.content.entry_mut() {
            edit(entry);
            self.dirty = true;
        }
    }

    pub(crate) fn set_ending(&mut self, ending: LineEnding) {
        if self.ending != ending {
            self.ending = ending;
            self.dirty = true;
        }
    }
}
