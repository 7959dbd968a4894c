//! Line Classification
//!
//! Turns one physical line (without its terminator) into [`LineContent`]. The order of the
//! checks matters:
//!
//!     1. blank: whitespace only
//!     2. commented: first non-whitespace is `;`. If what follows the marker run is a
//!        declaration, the line is a disabled declaration, otherwise a plain comment
//!     3. section header: `[name]`
//!     4. declaration: `key = value`, an extension entry when the key is `extension`
//!     5. anything else is kept as an opaque comment
//!
//! Classification is total. Unknown syntax is never an error, it just never matches a lookup.

use once_cell::sync::Lazy;
use regex::Regex;

use super::line::{Entry, Layout, LineContent};

/// Comment marker character of the php.ini dialect.
pub const COMMENT_CHAR: char = ';';

static SECTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[\s*(?P<name>[^\[\]]+?)\s*\]\s*$").unwrap());

/// `key = rest`. Keys cover dotted names (`date.timezone`) and array keys (`foo[]`).
static DECLARATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<indent>\s*)(?P<key>[A-Za-z_][A-Za-z0-9_.\-\[\]]*)(?P<sep>[ \t]*=[ \t]*)(?P<rest>.*)$",
    )
    .unwrap()
});

static COMMENTED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>\s*)(?P<marker>;+[ \t]*)(?P<rest>.*)$").unwrap());

static KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-\[\]]*$").unwrap());

/// Whether `key` reads back as the key of a declaration.
pub fn is_valid_key(key: &str) -> bool {
    KEY_REGEX.is_match(key)
}

/// Whether `value` reads back unchanged when written after `key = `.
///
/// Rejected: line terminators, surrounding whitespace (eaten by the separator), an unquoted
/// `;` (starts an inline comment) and an odd number of double quotes (would swallow a
/// trailing comment on re-read).
pub fn is_valid_value(value: &str) -> bool {
    if value.contains(['\n', '\r']) || value.trim() != value {
        return false;
    }
    if value.matches('"').count() % 2 != 0 {
        return false;
    }
    split_trailing(value) == (value, "")
}

/// Classify a single line.
pub fn classify_line(line: &str) -> LineContent {
    if line.trim().is_empty() {
        return LineContent::Blank;
    }

    if let Some(caps) = COMMENTED_REGEX.captures(line) {
        return match parse_declaration(&caps["rest"]) {
            Some((key, value, mut layout)) => {
                layout.marker = format!("{}{}", &caps["marker"], layout.indent);
                layout.indent = caps["indent"].to_string();
                LineContent::declaration(Entry::new(key, value, true, layout))
            }
            None => LineContent::Comment,
        };
    }

    if let Some(caps) = SECTION_REGEX.captures(line) {
        return LineContent::Section(caps["name"].to_string());
    }

    match parse_declaration(line) {
        Some((key, value, layout)) => LineContent::declaration(Entry::new(key, value, false, layout)),
        None => LineContent::Comment,
    }
}

/// Split `key = value ; comment` into its parts.
fn parse_declaration(text: &str) -> Option<(&str, &str, Layout)> {
    let caps = DECLARATION_REGEX.captures(text)?;
    let key = caps.name("key")?.as_str();
    let rest = caps.name("rest")?.as_str();
    let (value, trailing) = split_trailing(rest);

    let layout = Layout {
        indent: caps["indent"].to_string(),
        marker: String::new(),
        separator: caps["sep"].to_string(),
        trailing: trailing.to_string(),
    };
    Some((key, value, layout))
}

/// Separate a raw value from trailing whitespace and an inline comment.
///
/// A `;` inside double quotes belongs to the value.
fn split_trailing(rest: &str) -> (&str, &str) {
    let mut in_quotes = false;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            COMMENT_CHAR if !in_quotes => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let value = rest[..end].trim_end();
    (value, &rest[value.len()..])
}
