// src/watch/hash.rs

//! Content hashes for `use_hash`: skip dispatching a path whose bytes did
//! not change since it was last dispatched.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;

/// Compute the blake3 hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut reader = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Last dispatched hash per path. In memory only.
#[derive(Debug, Default)]
pub struct ContentHashes {
    hashes: HashMap<PathBuf, String>,
}

impl ContentHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `path` and record it; true if the content differs from the
    /// previous record (or there was none).
    ///
    /// Paths that cannot be hashed (removed, directories) count as changed
    /// and forget their previous hash.
    pub fn changed(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        if !fs.is_file(path) {
            self.hashes.remove(path);
            return true;
        }

        let hash = match compute_file_hash(fs, path) {
            Ok(hash) => hash,
            Err(err) => {
                debug!(?path, error = %err, "could not hash file; treating as changed");
                self.hashes.remove(path);
                return true;
            }
        };

        match self.hashes.insert(path.to_path_buf(), hash.clone()) {
            Some(previous) if previous == hash => false,
            _ => true,
        }
    }
}
