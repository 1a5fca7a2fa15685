// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Optional settings file (`Poul.toml`) as read from disk.
///
/// ```toml
/// [shell]
/// program = "sh"
/// flags = ["-e", "-u"]
///
/// [watch]
/// exclude = [".git", "target"]
/// settle_ms = 500
/// tick_ms = 1000
/// use_hash = false
/// ```
///
/// Every section and key is optional. Convert into [`Settings`] with
/// `TryFrom`, which validates the values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub shell: ShellSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    shell: ShellSection,
    watch: WatchSection,
}

impl Settings {
    pub(crate) fn new_unchecked(shell: ShellSection, watch: WatchSection) -> Self {
        Self { shell, watch }
    }

    pub fn shell(&self) -> &ShellSection {
        &self.shell
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    /// Apply command-line overrides for `poul watch`.
    pub fn with_watch_overrides(mut self, extra_excludes: &[String], use_hash: bool) -> Self {
        self.watch.exclude.extend(extra_excludes.iter().cloned());
        self.watch.use_hash |= use_hash;
        self
    }
}

/// `[shell]`: how step bodies are run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Shell binary, looked up on `PATH`.
    #[serde(default = "default_shell_program")]
    pub program: String,

    /// Flags placed before `-c <body>`. The default aborts on the first
    /// failing command and on expansion of unset variables.
    #[serde(default = "default_shell_flags")]
    pub flags: Vec<String>,
}

fn default_shell_program() -> String {
    "sh".to_string()
}

fn default_shell_flags() -> Vec<String> {
    vec!["-e".to_string(), "-u".to_string()]
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            program: default_shell_program(),
            flags: default_shell_flags(),
        }
    }
}

/// `[watch]`: debounce and filtering for `poul watch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Directories whose events are ignored.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Quiet time after the last event before a path is dispatched.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// How often pending paths are checked.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Skip dispatch when a file's content hash is unchanged.
    #[serde(default)]
    pub use_hash: bool,
}

fn default_settle_ms() -> u64 {
    500
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            settle_ms: default_settle_ms(),
            tick_ms: default_tick_ms(),
            use_hash: false,
        }
    }
}

impl WatchSection {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
