use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VoxtaskError};

/// Top-level configuration for voxtask.
///
/// Loaded from `~/.voxtask/config.toml` by default. Secrets are not stored
/// here: the task store token is read from the environment variable named
/// by [`TodoistConfig::api_token_env`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxtaskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub todoist: TodoistConfig,
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl VoxtaskConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VoxtaskConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VoxtaskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Todoist REST task store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoistConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Name of the environment variable holding the API token.
    pub api_token_env: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.todoist.com/rest/v2".to_string(),
            api_token_env: "TODOIST_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Command interpreter service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Endpoint accepting `{UserInput, TaskString}` and answering `{AIResponse}`.
    pub url: String,
    /// Per-request timeout in seconds. Model inference is slow.
    pub timeout_secs: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            url: "https://open-ai-logic-for-todolist-objects.ebaadforrandomstuff.workers.dev/"
                .to_string(),
            timeout_secs: 60,
        }
    }
}

/// Diagnostics log sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Whether interaction logs are posted at all.
    pub enabled: bool,
    /// Endpoint receiving the interaction log record.
    pub url: String,
    /// Version tag of the interpreter prompt, sent with each record.
    pub prompt_version: String,
    /// Also send logs for confirmed batches (canceled batches are always sent).
    pub send_on_confirm: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://todoist-log-kv.ebaadforrandomstuff.workers.dev/".to_string(),
            prompt_version: "0.1".to_string(),
            send_on_confirm: false,
        }
    }
}

/// Interaction session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Task filter used to build the interpreter context.
    pub default_filter: String,
    /// Locale applied to due expressions the interpreter leaves untagged.
    pub due_lang: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_filter: "today | 7 days".to_string(),
            due_lang: None,
        }
    }
}
