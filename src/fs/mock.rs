// src/fs/mock.rs

//! In-memory filesystem for tests.
//!
//! Paths are stored cleaned, so `./src/a.c` and `src/a.c` name the same
//! entry. Parent directories are created implicitly.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};

use super::FileSystem;
use crate::pattern::clean_path;

#[derive(Debug, Clone)]
enum MockEntry {
    File(Vec<u8>),
    Dir(BTreeSet<String>),
}

#[derive(Debug, Clone)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<String, MockEntry>>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(".".to_string(), MockEntry::Dir(BTreeSet::new()));
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Add (or overwrite) a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let key = clean_path(path.as_ref());
        let mut entries = self.lock();
        link_into_parent(&mut entries, &key);
        entries.insert(key, MockEntry::File(content.into()));
    }

    /// Add an empty directory, creating its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let key = clean_path(path.as_ref());
        let mut entries = self.lock();
        ensure_dir(&mut entries, &key);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, MockEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, path: &Path) -> Option<MockEntry> {
        self.lock().get(&clean_path(path)).cloned()
    }
}

fn parent_and_name(key: &str) -> Option<(String, String)> {
    if key == "." || key == "/" {
        return None;
    }
    match key.rsplit_once('/') {
        Some(("", name)) => Some(("/".to_string(), name.to_string())),
        Some((parent, name)) => Some((parent.to_string(), name.to_string())),
        None => Some((".".to_string(), key.to_string())),
    }
}

fn link_into_parent(entries: &mut BTreeMap<String, MockEntry>, key: &str) {
    if let Some((parent, name)) = parent_and_name(key) {
        ensure_dir(entries, &parent);
        if let Some(MockEntry::Dir(children)) = entries.get_mut(&parent) {
            children.insert(name);
        }
    }
}

fn ensure_dir(entries: &mut BTreeMap<String, MockEntry>, key: &str) {
    if entries.contains_key(key) {
        return;
    }
    entries.insert(key.to_string(), MockEntry::Dir(BTreeSet::new()));
    link_into_parent(entries, key);
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        match self.get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.get(path), Some(MockEntry::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
