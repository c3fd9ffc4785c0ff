//! Investment board configuration
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional
//! TOML file, then `BOARD_*` environment variables (nested keys joined with
//! `__`, e.g. `BOARD_CLIENT__MODEL=gpt-4o`).

use super::agent::Role;
use generation_client::ClientConfig;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// File picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "investment-board.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "BOARD_CONFIG";

/// Overall board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Maximum log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Generation client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Persona overrides
    #[serde(default)]
    pub instructions: InstructionOverrides,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            client: ClientConfig::default(),
            instructions: InstructionOverrides::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Replacement instructions; unset entries keep the built-in persona
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesizer: Option<String>,
}

impl InstructionOverrides {
    pub fn for_role(&self, role: Role) -> Option<&str> {
        let value = match role {
            Role::Strategist => &self.strategist,
            Role::Technical => &self.technical,
            Role::Risk => &self.risk,
            Role::Platform => &self.platform,
        };
        non_blank(value)
    }

    pub fn for_synthesizer(&self) -> Option<&str> {
        non_blank(&self.synthesizer)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl BoardConfig {
    /// Load using `BOARD_CONFIG` if set, else the default file if present
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref())
    }

    /// Load from an explicit file (must exist) or the optional default file
    pub fn load_from(path: Option<&str>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::new(path, config::FileFormat::Toml),
            None => config::File::new(DEFAULT_CONFIG_FILE, config::FileFormat::Toml).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("BOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parsed log level, falling back to INFO
    pub fn max_log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

/// Load configuration from a TOML file, without environment overrides
pub fn load_config(path: &str) -> anyhow::Result<BoardConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: BoardConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &BoardConfig, path: &str) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Write a commented configuration template
pub fn create_config_template(path: &str) -> anyhow::Result<()> {
    let template = "# Investment Board Configuration
# Every key is optional; environment variables such as
# BOARD_CLIENT__MODEL override values from this file.

# Maximum log level (trace, debug, info, warn, error)
log_level = \"info\"

[client]
# openai (any OpenAI-compatible API) or echo (offline dry run)
provider = \"openai\"

# Base URL without the /v1 path
base_url = \"https://api.openai.com\"

model = \"gpt-4.1\"
temperature = 0.7

# Per-request timeout (seconds)
timeout_secs = 60

# Environment variable holding the API key
api_key_env = \"OPENAI_API_KEY\"

# Optional cap on generated tokens per call
# max_tokens = 800

[instructions]
# Replace a board member's persona, e.g.
# risk = \"You're a Risk Manager focused on capital preservation.\"
# synthesizer = \"You're the Chairperson of the Investment Board. ...\"
";

    std::fs::write(path, template)?;
    Ok(())
}
