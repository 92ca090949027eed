use thiserror::Error;

use crate::config::{AgentSettings, DisplaySettings, Settings};
use crate::prompt::PromptSource;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_agent(&settings.agent) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_display(&settings.display) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_agent(agent: &AgentSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if agent.session_base.trim().is_empty() {
            errors.push(ValidationError::MissingField("agent.session_base".to_string()));
        }

        if agent.streaming.guardrail_interval <= 0 {
            errors.push(ValidationError::InvalidValue {
                field: "streaming.guardrail_interval".to_string(),
                reason: "Guardrail interval must be greater than 0".to_string(),
            });
        }

        if let Some(endpoint) = &agent.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                errors.push(ValidationError::InvalidValue {
                    field: "agent.endpoint".to_string(),
                    reason: format!("Endpoint '{}' must be an http(s) URL", endpoint),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_display(display: &DisplaySettings) -> Result<(), Vec<ValidationError>> {
        match &display.prompt {
            PromptSource::Fixed(text) if text.trim().is_empty() => {
                Err(vec![ValidationError::InvalidValue {
                    field: "display.prompt".to_string(),
                    reason: "Prompt cannot be empty".to_string(),
                }])
            }
            _ => Ok(()),
        }
    }
}
