//! Top-level errors and process exit codes

use std::process::ExitCode;

use thiserror::Error;

use crate::agent::error::InvocationError;
use crate::config::ConfigError;

/// Exit code for a successful run or an interactive cancel
pub const EXIT_OK: u8 = 0;
/// Exit code when input ends while prompting, or the terminal fails
pub const EXIT_INPUT: u8 = 1;
/// Exit code for missing or invalid configuration
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when the service client cannot be created
pub const EXIT_CLIENT: u8 = 3;
/// Exit code when the agent invocation fails
pub const EXIT_INVOCATION: u8 = 4;

/// Errors that end a demo run
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize AWS client: {0:#}")]
    ClientInitialization(anyhow::Error),

    #[error("Error invoking agent: {0}")]
    Invocation(#[from] InvocationError),

    #[error("Unexpected end of input")]
    InputClosed,

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemoError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DemoError::Config(_) => EXIT_CONFIG,
            DemoError::ClientInitialization(_) => EXIT_CLIENT,
            DemoError::Invocation(_) => EXIT_INVOCATION,
            DemoError::InputClosed | DemoError::Io(_) => EXIT_INPUT,
        }
    }
}

impl From<&DemoError> for ExitCode {
    fn from(err: &DemoError) -> Self {
        ExitCode::from(err.exit_code())
    }
}
