//! Preferences files on disk

use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use super::document::Document;
use super::error::{PrefsError, Result};
use super::legacy;

/// Whole-file text I/O used by [`Prefs`]
pub trait TextStore {
    /// Read the entire file
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the file with `contents`
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`TextStore`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl TextStore for FsStore {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Where the data in a [`Prefs`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Created in memory
    #[default]
    Empty,
    /// The file did not exist; started fresh
    Missing,
    /// Parsed from JSON
    Native,
    /// Converted from a legacy XML file
    Legacy,
}

/// A preferences document bound to an optional file path.
///
/// Dereferences to [`Document`] for reading and writing values. Two stores
/// are equal when they serialize to identical text.
#[derive(Debug, Clone, Default)]
pub struct Prefs {
    path: Option<PathBuf>,
    root: Document,
    source: Source,
}

impl Prefs {
    /// Create empty preferences with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing document, with no backing file
    pub fn from_document(root: Document) -> Self {
        Self {
            path: None,
            root,
            source: Source::Empty,
        }
    }

    /// Load preferences from the filesystem.
    ///
    /// A missing file gives empty preferences bound to `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(&FsStore, path)
    }

    /// Load preferences through `store`
    pub fn load_with(store: &dyn TextStore, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (root, source) = read_document(store, path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            root,
            source,
        })
    }

    /// Re-read the bound file, discarding in-memory changes
    pub fn reload(&mut self) -> Result<()> {
        self.reload_with(&FsStore)
    }

    pub fn reload_with(&mut self, store: &dyn TextStore) -> Result<()> {
        let path = self.path.as_deref().ok_or(PrefsError::NoPath)?;
        let (root, source) = read_document(store, path)?;
        self.root = root;
        self.source = source;
        Ok(())
    }

    /// Write to the bound file
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(PrefsError::NoPath)?;
        self.save_with(&FsStore, path)
    }

    /// Write to `path`; the bound file is unchanged
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(&FsStore, path.as_ref())
    }

    /// Write to `path` through `store`.
    ///
    /// The parent directory must already exist.
    pub fn save_with(&self, store: &dyn TextStore, path: &Path) -> Result<()> {
        let mut content = self.root.to_json_string()?;
        content.push('\n');
        store.write(path, &content).map_err(|source| PrefsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved preferences to: {}", path.display());
        Ok(())
    }

    /// The bound file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bind to a different file without reading or writing
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Whether the data was converted from a legacy file
    pub fn is_legacy(&self) -> bool {
        self.source == Source::Legacy
    }

    pub fn document(&self) -> &Document {
        &self.root
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.root
    }

    pub fn into_document(self) -> Document {
        self.root
    }
}

fn read_document(store: &dyn TextStore, path: &Path) -> Result<(Document, Source)> {
    let content = match store.read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::info!("No preferences at {}, starting fresh", path.display());
            return Ok((Document::new(), Source::Missing));
        }
        Err(source) => {
            return Err(PrefsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let parsed = parse_content(path, &content)?;
    tracing::info!("Loaded preferences from: {}", path.display());
    Ok(parsed)
}

fn parse_content(path: &Path, content: &str) -> Result<(Document, Source)> {
    match Document::from_json_str(content) {
        Ok(doc) => Ok((doc, Source::Native)),
        // Only unreadable JSON falls back; a JSON value of the wrong shape is an error
        Err(native) if native.is_syntax() || native.is_eof() => {
            tracing::debug!("{} is not JSON ({}), trying legacy XML", path.display(), native);
            match legacy::import_str(content) {
                Ok(doc) => {
                    tracing::info!("Converted legacy preferences from: {}", path.display());
                    Ok((doc, Source::Legacy))
                }
                Err(legacy) => Err(PrefsError::Parse {
                    path: path.to_path_buf(),
                    native,
                    legacy,
                }),
            }
        }
        Err(source) => Err(PrefsError::InvalidNative {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl Deref for Prefs {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.root
    }
}

impl DerefMut for Prefs {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.root
    }
}

impl PartialEq for Prefs {
    fn eq(&self, other: &Self) -> bool {
        match (self.root.to_json_string(), other.root.to_json_string()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false,
        }
    }
}

impl fmt::Display for Prefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.root.to_json_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
