use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::Deserialize;
use thiserror::Error;

pub mod validator;

use crate::agent::domain::{StreamingOptions, DEFAULT_SESSION_BASE};
use crate::cli::Cli;
use crate::display::OutputStyle;
use crate::prompt::PromptSource;

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "bedrock-agent.toml";

pub const AGENT_ID_VAR: &str = "AWS_BEDROCK_AGENT_ID";
pub const ALIAS_ID_VAR: &str = "AWS_BEDROCK_ALIAS_ID";

/// Errors raised while building [`Settings`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required identifier is absent or blank
    #[error("{variable} not found in environment variables")]
    Missing { variable: &'static str },

    #[error("Configuration validation failed:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Validated application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub agent: AgentSettings,
    pub display: DisplaySettings,
}

/// Everything needed to address and invoke one agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub agent_id: String,
    pub alias_id: String,
    /// Falls back to the AWS SDK region chain when unset
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub session_base: String,
    pub enable_trace: bool,
    /// 0 disables the timeout
    pub timeout_secs: u64,
    pub streaming: StreamingOptions,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_id: String::new(),
            alias_id: String::new(),
            region: None,
            endpoint: None,
            session_base: DEFAULT_SESSION_BASE.to_string(),
            enable_trace: true,
            timeout_secs: default_timeout(),
            streaming: StreamingOptions::default(),
        }
    }
}

/// How the question is obtained and how output looks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub style: OutputStyle,
    pub prompt: PromptSource,
}

/// Shape of the optional TOML file
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    #[serde(default)]
    agent: FileAgentSection,
    #[serde(default)]
    streaming: FileStreamingSection,
    #[serde(default)]
    display: FileDisplaySection,
}

#[derive(Debug, Deserialize)]
struct FileAgentSection {
    agent_id: Option<String>,
    alias_id: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
    #[serde(default = "default_session_base")]
    session_base: String,
    #[serde(default = "default_enable_trace")]
    enable_trace: bool,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct FileStreamingSection {
    #[serde(default = "default_guardrail_interval")]
    guardrail_interval: i32,
    #[serde(default)]
    stream_final_response: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FileDisplaySection {
    #[serde(default)]
    style: OutputStyle,
    prompt: Option<String>,
}

impl Default for FileAgentSection {
    fn default() -> Self {
        Self {
            agent_id: None,
            alias_id: None,
            region: None,
            endpoint: None,
            session_base: default_session_base(),
            enable_trace: default_enable_trace(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for FileStreamingSection {
    fn default() -> Self {
        Self {
            guardrail_interval: default_guardrail_interval(),
            stream_final_response: false,
        }
    }
}

fn default_session_base() -> String {
    DEFAULT_SESSION_BASE.to_string()
}

fn default_enable_trace() -> bool {
    true
}

fn default_timeout() -> u64 {
    120
}

fn default_guardrail_interval() -> i32 {
    StreamingOptions::default().guardrail_interval
}

impl Settings {
    /// Build settings from CLI arguments (which already carry env vars) and the config file.
    ///
    /// Precedence: CLI flag / env var > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => Self::load_file(path, true)?,
            None => Self::load_file(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };

        let settings = Self::resolve(file, cli)?;

        validator::ConfigValidator::validate(&settings).map_err(|errors| {
            ConfigError::Invalid(errors.iter().map(|e| e.to_string()).collect())
        })?;

        Ok(settings)
    }

    fn load_file(path: &Path, required: bool) -> Result<FileSettings, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(PathBuf::from(path)).required(required))
            .set_default("agent.session_base", DEFAULT_SESSION_BASE)?
            .set_default("agent.enable_trace", true)?
            .set_default("agent.timeout_secs", 120)?
            .set_default("streaming.guardrail_interval", 20)?
            .set_default("streaming.stream_final_response", false)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Apply CLI overrides to the file settings and check required identifiers
    fn resolve(file: FileSettings, cli: &Cli) -> Result<Self, ConfigError> {
        let agent_id = required(cli.agent_id.as_ref().or(file.agent.agent_id.as_ref()), AGENT_ID_VAR)?;
        let alias_id = required(cli.alias_id.as_ref().or(file.agent.alias_id.as_ref()), ALIAS_ID_VAR)?;

        let agent = AgentSettings {
            agent_id,
            alias_id,
            region: non_blank(cli.region.clone().or(file.agent.region)),
            endpoint: non_blank(cli.endpoint.clone().or(file.agent.endpoint)),
            session_base: cli
                .session_base
                .clone()
                .unwrap_or(file.agent.session_base),
            enable_trace: file.agent.enable_trace && !cli.no_trace,
            timeout_secs: cli.timeout_secs.unwrap_or(file.agent.timeout_secs),
            streaming: StreamingOptions {
                guardrail_interval: cli
                    .guardrail_interval
                    .unwrap_or(file.streaming.guardrail_interval),
                stream_final_response: cli.stream_final_response
                    || file.streaming.stream_final_response,
            },
        };

        let style = if cli.plain {
            OutputStyle::Plain
        } else {
            file.display.style
        };

        let prompt = match cli.prompt.clone().or(file.display.prompt) {
            Some(text) => PromptSource::Fixed(text),
            None => PromptSource::Interactive,
        };

        Ok(Self {
            agent,
            display: DisplaySettings { style, prompt },
        })
    }
}

fn required(value: Option<&String>, variable: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing { variable }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            agent_id: Some("AGENT123".to_string()),
            alias_id: Some("ALIAS456".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_from_cli_only() {
        let settings = Settings::resolve(FileSettings::default(), &cli()).unwrap();
        assert_eq!(settings.agent.agent_id, "AGENT123");
        assert_eq!(settings.agent.alias_id, "ALIAS456");
        assert_eq!(settings.agent.session_base, DEFAULT_SESSION_BASE);
        assert_eq!(settings.agent.streaming, StreamingOptions::default());
        assert_eq!(settings.display.style, OutputStyle::Decorated);
        assert_eq!(settings.display.prompt, PromptSource::Interactive);
    }

    #[test]
    fn test_missing_agent_id_names_variable() {
        let cli = Cli {
            agent_id: None,
            ..cli()
        };
        let err = Settings::resolve(FileSettings::default(), &cli).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { variable: AGENT_ID_VAR }));
        assert!(err.to_string().contains("AWS_BEDROCK_AGENT_ID"));
    }

    #[test]
    fn test_blank_alias_id_is_missing() {
        let cli = Cli {
            alias_id: Some("   ".to_string()),
            ..cli()
        };
        let err = Settings::resolve(FileSettings::default(), &cli).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { variable: ALIAS_ID_VAR }));
    }

    #[test]
    fn test_agent_id_checked_before_alias_id() {
        let err = Settings::resolve(FileSettings::default(), &Cli::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { variable: AGENT_ID_VAR }));
    }

    #[test]
    fn test_cli_flags_select_plain_fixed_prompt() {
        let cli = Cli {
            plain: true,
            prompt: Some("What is Medicare?".to_string()),
            no_trace: true,
            ..cli()
        };
        let settings = Settings::resolve(FileSettings::default(), &cli).unwrap();
        assert_eq!(settings.display.style, OutputStyle::Plain);
        assert_eq!(
            settings.display.prompt,
            PromptSource::Fixed("What is Medicare?".to_string())
        );
        assert!(!settings.agent.enable_trace);
    }

    #[test]
    fn test_blank_region_falls_back_to_sdk_chain() {
        let cli = Cli {
            region: Some(String::new()),
            ..cli()
        };
        let settings = Settings::resolve(FileSettings::default(), &cli).unwrap();
        assert!(settings.agent.region.is_none());
    }
}
