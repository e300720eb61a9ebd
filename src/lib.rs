//! Prefs - hierarchical preferences files
//!
//! Loads a nested key/value document from JSON, converting legacy XML
//! preference files on the fly, and writes it back as sorted, indented JSON.
//!
//! ```no_run
//! use prefs::Prefs;
//!
//! let mut prefs = Prefs::load("settings.pref")?;
//! prefs.child("window")?.insert("width", 640)?;
//! prefs.set("window.title", "main")?;
//! assert_eq!(prefs.get_i64("window.width"), Some(640));
//! prefs.save()?;
//! # Ok::<(), prefs::PrefsError>(())
//! ```

pub mod core;

pub use crate::core::document::{normalize_path, Document, RESERVED_PREFIX};
pub use crate::core::error::{PrefsError, Result};
pub use crate::core::legacy::{import_str, LegacyNode};
pub use crate::core::literal::parse_literal;
pub use crate::core::locations::PrefsDirs;
pub use crate::core::store::{FsStore, Prefs, Source, TextStore};
pub use crate::core::value::Value;
