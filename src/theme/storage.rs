use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::FolioError;

/// A flat string key-value table that survives restarts.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, FolioError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), FolioError>;
}

/// Preferences kept in a TOML table on disk, rewritten on every change.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Opens the table at `path`; a missing file is an empty table.
    ///
    /// Unparseable files and non-string entries are dropped with a warning so
    /// the next `set` rewrites the file instead of losing persistence.
    pub fn open(path: &Path) -> Result<Self, FolioError> {
        let entries = if path.exists() {
            parse_entries(path, &std::fs::read_to_string(path)?)
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Opens `~/.config/holofolio/preferences.toml`.
    pub fn open_default() -> Result<Self, FolioError> {
        Self::open(&crate::config::preferences_path()?)
    }

    fn flush(&self) -> Result<(), FolioError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

fn parse_entries(path: &Path, contents: &str) -> BTreeMap<String, String> {
    let table = match contents.parse::<toml::Table>() {
        Ok(table) => table,
        Err(error) => {
            log::warn!("Discarding unreadable preferences at {}: {error}", path.display());
            return BTreeMap::new();
        }
    };

    table
        .into_iter()
        .filter_map(|(key, value)| match value {
            toml::Value::String(text) => Some((key, text)),
            other => {
                log::warn!("Skipping non-string preference {key:?} = {other}");
                None
            }
        })
        .collect()
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, FolioError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FolioError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Session-only preferences. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls seen by any clone.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, FolioError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FolioError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
