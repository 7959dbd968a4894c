//! # phpini
//!
//! Lossless editing of `php.ini` style configuration files.
//!
//! A file is read into a [`Document`]: an ordered list of line records, one per physical
//! line. Settings and extension declarations can be read and changed through the document,
//! and saving renders every untouched line exactly as it was read. The only lines that differ
//! after a save are the ones that were edited, so a textual diff of the result stays minimal.
//!
//! File Layout
//!
//! src/ini
//!   ├── line              Line records and their regenerated text
//!   ├── classification    One raw line -> typed line content
//!   ├── document          The ordered record arena and key resolution
//!   ├── loader            Building documents from files and strings
//!   ├── settings          get / set over `key = value` lines
//!   ├── extensions        enable / disable of `extension = name` lines
//!   └── serializer        Rendering and atomic saving
//! src/config.rs           Layered formatting configuration
//!
//! Example
//!
//!     let mut doc = Document::load("php.ini")?;
//!     doc.set("memory_limit", "127M")?;
//!     doc.enable_extension("mbstring")?;
//!     doc.save_to("php.ini.out")?;

pub mod config;
pub mod ini;

pub use config::{FormatConfig, LineEndingPolicy, PhpIniConfig};
pub use ini::{Document, IniError, LineKind, LineRecord};
