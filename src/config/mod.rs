// src/config/mod.rs

//! Optional `Poul.toml` settings.
//!
//! - `model.rs`: serde data model and defaults.
//! - `loader.rs`: reading the file (absent file means defaults).
//! - `validate.rs`: `RawSettings` -> `Settings` checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_SETTINGS_FILE, load_from_path, load_settings};
pub use model::{RawSettings, Settings, ShellSection, WatchSection};
