//! The `php.ini` document model.
//!
//! Reading, editing and writing are all expressed as methods on [`Document`]; each concern
//! lives in its own module as a separate `impl Document` block:
//!
//!     - [loader]: parse text into records
//!     - [settings]: `get` / `set` / `unset` by key
//!     - [extensions]: enable / disable / list extension declarations
//!     - [serializer]: render and save
//!
//! Classification is total: every physical line produces a record, and a line that does not
//! look like anything known is kept as an opaque comment. There is therefore no parse error.

pub mod classification;
pub mod document;
pub mod error;
pub mod extensions;
pub mod line;
pub mod loader;
pub mod serializer;
pub mod settings;

pub use classification::{classify_line, is_valid_key, is_valid_value};
pub use document::{ChangeKind, Document, LineChange};
pub use error::{IniError, IniResult};
pub use extensions::EnabledExtensions;
pub use line::{Entry, LineContent, LineEnding, LineKind, LineRecord};
pub use settings::SettingHandle;
