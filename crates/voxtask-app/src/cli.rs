//! CLI argument definitions for the voxtask binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// voxtask: manage Todoist tasks with spoken-style commands.
#[derive(Parser, Debug)]
#[command(name = "voxtask", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Todoist filter query selecting the tasks given to the interpreter.
    #[arg(short = 'f', long = "filter")]
    pub filter: Option<String>,

    /// Run a single command and exit instead of reading from stdin.
    #[arg(short = 't', long = "text")]
    pub text: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VOXTASK_CONFIG env var > ~/.voxtask/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VOXTASK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the task filter. Priority: --filter flag > config file value.
    pub fn resolve_filter(&self, config_filter: &str) -> String {
        self.filter
            .clone()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| config_filter.to_string())
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".voxtask").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".voxtask").join("config.toml");
    }
    PathBuf::from("config.toml")
}
