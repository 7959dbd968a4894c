//! Settings accessor
//!
//! `get` / `set` over `key = value` declarations. Values are plain strings; no type
//! conversion happens here. `set` follows three steps:
//!
//!     1. update the resolved active record in place
//!     2. otherwise uncomment the first commented record for the key, in place
//!     3. otherwise append a new record at the end of the document
//!
//! Keys and values are checked before anything is written: a key the classifier would not
//! read back as a key, or a value that would not read back unchanged (line terminators, an
//! unquoted `;`, surrounding whitespace, unbalanced quotes), is refused with
//! [`IniError::InvalidKey`] or [`IniError::InvalidValue`] and the document is left as it was.
//! Callers that need a `;` in a value quote it themselves: `"x;y"`.
//!
//! [`SettingHandle`] offers attribute-style access (`doc.setting("memory_limit").set("127M")`)
//! and goes through the same methods.

use tracing::debug;

use super::classification::{is_valid_key, is_valid_value};
use super::document::{Document, Resolved};
use super::error::{IniError, IniResult};
use super::line::{Entry, Layout};

impl Document {
    /// Value of the resolved active record for `key`, or `default`.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.get_opt(key).unwrap_or(default).to_string()
    }

    /// Value of the resolved active record for `key`.
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        match self.resolve_key(key)? {
            Resolved::Active(index) => self.record(index)?.value(),
            Resolved::Commented(_) => None,
        }
    }

    /// Whether an active record exists for `key`.
    pub fn is_set(&self, key: &str) -> bool {
        matches!(self.resolve_key(key), Some(Resolved::Active(_)))
    }

    /// Set `key` to `value`, reusing an existing or commented line when there is one.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidKey`] or [`IniError::InvalidValue`] when the line could not be read
    /// back as `key = value`. Nothing is changed in that case.
    pub fn set(&mut self, key: &str, value: &str) -> IniResult<()> {
        if !is_valid_key(key) {
            return Err(IniError::InvalidKey { key: key.to_string() });
        }
        if !is_valid_value(value) {
            return Err(IniError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        match self.resolve_key(key) {
            Some(Resolved::Active(index)) => {
                self.record_mut(index).edit_entry(|entry| entry.set_value(value));
                debug!(key, value, line = index + 1, "updated setting");
            }
            Some(Resolved::Commented(index)) => {
                let marker = self.format().comment_marker.clone();
                self.record_mut(index).edit_entry(|entry| {
                    entry.set_commented(false, &marker);
                    entry.set_value(value);
                });
                debug!(key, value, line = index + 1, "uncommented setting");
            }
            None => {
                let layout = Layout::with_separator(&self.format().setting_separator);
                let index = self.insert_entry(self.len(), Entry::new(key, value, false, layout));
                debug!(key, value, line = index + 1, "appended setting");
            }
        }
        Ok(())
    }

    /// Comment out every active record for `key`, in place. No-op when none is active.
    pub fn unset(&mut self, key: &str) {
        let marker = self.format().comment_marker.clone();
        let active: Vec<usize> = self
            .entries()
            .filter(|(_, entry)| entry.key() == key && entry.is_active())
            .map(|(index, _)| index)
            .collect();
        for index in active {
            self.record_mut(index)
                .edit_entry(|entry| entry.set_commented(true, &marker));
            debug!(key, line = index + 1, "commented out setting");
        }
    }

    /// Attribute-style access to one setting.
    pub fn setting<'a>(&'a mut self, key: &str) -> SettingHandle<'a> {
        SettingHandle {
            document: self,
            key: key.to_string(),
        }
    }

    fn resolve_key(&self, key: &str) -> Option<Resolved> {
        self.resolve_by(|entry| entry.key() == key)
    }
}

/// A named setting of a document; sugar over [`Document::get`] and [`Document::set`].
pub struct SettingHandle<'a> {
    document: &'a mut Document,
    key: String,
}

impl SettingHandle<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.document.get_opt(&self.key)
    }

    pub fn get_or(&self, default: &str) -> String {
        self.document.get(&self.key, default)
    }

    pub fn set(&mut self, value: &str) -> IniResult<&mut Self> {
        self.document.set(&self.key, value)?;
        Ok(self)
    }

    pub fn unset(&mut self) -> &mut Self {
        self.document.unset(&self.key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_default_when_absent() {
        let doc = Document::parse("a = 1\n");
        assert_eq!(doc.get("b", "fallback"), "fallback");
        assert_eq!(doc.get_opt("b"), None);
    }

    #[test]
    fn test_get_ignores_commented_records() {
        let doc = Document::parse(";memory_limit = 128M\n");
        assert_eq!(doc.get("memory_limit", "none"), "none");
        assert!(!doc.is_set("memory_limit"));
    }

    #[test]
    fn test_get_last_active_wins() {
        let doc = Document::parse("precision = 14\nprecision = 17\n;precision = 1\n");
        assert_eq!(doc.get("precision", ""), "17");
    }

    #[test]
    fn test_set_existing_in_place() {
        let mut doc = Document::parse("[PHP]\nmemory_limit = 1024M\nengine = On\n");
        doc.set("memory_limit", "127M").expect("set");
        assert_eq!(doc.render(), "[PHP]\nmemory_limit = 127M\nengine = On\n");
    }

    #[test]
    fn test_set_updates_only_last_duplicate() {
        let mut doc = Document::parse("a = 1\na = 2\n");
        doc.set("a", "3").expect("set");
        assert_eq!(doc.render(), "a = 1\na = 3\n");
    }

    #[test]
    fn test_set_uncomments_in_place() {
        let mut doc = Document::parse("[Date]\n;date.timezone =\n[Session]\n");
        doc.set("date.timezone", "Europe/Paris").expect("set");
        assert_eq!(
            doc.render(),
            "[Date]\ndate.timezone = Europe/Paris\n[Session]\n"
        );
    }

    #[test]
    fn test_set_appends_new_setting() {
        let mut doc = Document::parse("engine = On\n");
        doc.set("max_execution_time", "30").expect("set");
        assert_eq!(doc.render(), "engine = On\nmax_execution_time = 30\n");
    }

    #[test]
    fn test_unset_comments_out_active_records() {
        let mut doc = Document::parse("display_errors = On\n");
        doc.unset("display_errors");
        assert_eq!(doc.render(), ";display_errors = On\n");
        assert_eq!(doc.get("display_errors", "Off"), "Off");

        doc.unset("display_errors");
        assert_eq!(doc.render(), ";display_errors = On\n");
    }

    #[test]
    fn test_setting_handle_routes_through_get_and_set() {
        let mut doc = Document::parse("memory_limit = 1024M\n");
        assert_eq!(doc.setting("memory_limit").value(), Some("1024M"));

        doc.setting("memory_limit").set("127M").expect("set");
        assert_eq!(doc.get("memory_limit", ""), "127M");
        assert_eq!(doc.setting("upload_max_filesize").get_or("2M"), "2M");
    }

    #[test]
    fn test_set_refuses_multiline_value() {
        let mut doc = Document::parse("a = 1\n");
        let err = doc.set("a", "1\nextension=evil").unwrap_err();
        assert!(matches!(err, IniError::InvalidValue { .. }));
        assert_eq!(doc.render(), "a = 1\n");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_set_refuses_unparseable_keys() {
        let mut doc = Document::parse("a = 1\n");
        for key in ["my key", "", "a = b", ";a"] {
            let err = doc.set(key, "v").unwrap_err();
            assert!(matches!(err, IniError::InvalidKey { .. }), "{key:?}");
        }
        assert_eq!(doc.render(), "a = 1\n");
    }

    #[test]
    fn test_set_refuses_unquoted_semicolon() {
        let mut doc = Document::parse("a = 1\n");
        assert!(matches!(
            doc.set("a", "x;y"),
            Err(IniError::InvalidValue { .. })
        ));

        doc.set("a", "\"x;y\"").expect("quoted value");
        assert_eq!(doc.render(), "a = \"x;y\"\n");
        assert_eq!(Document::parse(&doc.render()).get("a", ""), "\"x;y\"");
    }

    #[test]
    fn test_handle_set_propagates_errors() {
        let mut doc = Document::parse("");
        assert!(doc.setting("a").set(" padded ").is_err());
        assert!(doc.is_empty());
    }
}
