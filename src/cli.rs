// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_SETTINGS_FILE;
use crate::rules::DEFAULT_RULE_FILE;

/// Command-line arguments for `poul`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "poul",
    version,
    about = "Build files from pattern rules and rebuild them when sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the rule file.
    #[arg(
        long,
        short = 'f',
        global = true,
        value_name = "PATH",
        env = "POUL_FILE",
        default_value = DEFAULT_RULE_FILE
    )]
    pub file: PathBuf,

    /// Path to the optional settings file (TOML).
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "POUL_SETTINGS",
        default_value = DEFAULT_SETTINGS_FILE
    )]
    pub settings: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POUL_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the parsed steps and templates without running anything.
    Dump,

    /// Parse the rule file and check that template hooks resolve and do
    /// not form a cycle.
    Check,

    /// Run every step whose source pattern matches each given file.
    Compile {
        #[arg(required = true, value_name = "SOURCE")]
        sources: Vec<String>,
    },

    /// Build each given file with the first step whose destination matches.
    Build {
        #[arg(required = true, value_name = "DEST")]
        dests: Vec<String>,
    },

    /// Run a template with its hooks.
    Run {
        #[arg(value_name = "TEMPLATE")]
        template: String,
    },

    /// Watch a directory and recompile changed files and their dependents.
    Watch {
        /// Directory to watch.
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Directories to ignore (comma separated), on top of the settings
        /// file.
        #[arg(long, value_name = "DIR", value_delimiter = ',', env = "POUL_EXCLUDE")]
        exclude: Vec<String>,

        /// Skip files whose content did not change since their last
        /// dispatch.
        #[arg(long)]
        use_hash: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_excludes_split_on_commas() {
        let args =
            CliArgs::try_parse_from(["poul", "watch", "src", "--exclude", "target,.git"]).unwrap();
        match args.command {
            Command::Watch { dir, exclude, use_hash } => {
                assert_eq!(dir, PathBuf::from("src"));
                assert_eq!(exclude, vec!["target".to_string(), ".git".to_string()]);
                assert!(!use_hash);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args = CliArgs::try_parse_from([
            "poul", "build", "out/a", "out/b", "--file", "rules/Poulfile", "--log-level", "debug",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("rules/Poulfile"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(matches!(args.command, Command::Build { ref dests } if dests.len() == 2));
    }

    #[test]
    fn compile_requires_a_source() {
        assert!(CliArgs::try_parse_from(["poul", "compile"]).is_err());
    }
}
