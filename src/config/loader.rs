// src/config/loader.rs

use std::path::Path;

use tracing::debug;

use crate::config::model::{RawSettings, Settings};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Settings file looked up when `--settings` / `POUL_SETTINGS` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "Poul.toml";

/// Deserialize a settings file without validating it.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawSettings> {
    let contents = fs.read_to_string(path.as_ref())?;
    let raw: RawSettings = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load and validate settings.
///
/// The settings file is optional: if `path` does not exist the defaults
/// are returned. A file that exists but is malformed is an error.
pub fn load_settings(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    if !fs.exists(path) {
        debug!(path = %path.display(), "no settings file; using defaults");
        return Settings::try_from(RawSettings::default());
    }

    let raw = load_from_path(fs, path)?;
    let settings = Settings::try_from(raw)?;
    debug!(path = %path.display(), ?settings, "loaded settings");
    Ok(settings)
}
