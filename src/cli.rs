use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Ask a question to an AWS Bedrock agent and stream back its answer
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "bedrock-agent", version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional TOML configuration file (defaults to ./bedrock-agent.toml when present)
    #[arg(short, long, env = "BEDROCK_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bedrock agent identifier
    #[arg(long, env = "AWS_BEDROCK_AGENT_ID")]
    pub agent_id: Option<String>,

    /// Bedrock agent alias identifier
    #[arg(long, env = "AWS_BEDROCK_ALIAS_ID")]
    pub alias_id: Option<String>,

    /// AWS region of the agent
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom endpoint URL for the agent runtime service
    #[arg(long, env = "AWS_BEDROCK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Fixed prefix of the generated session id
    #[arg(long, env = "BEDROCK_AGENT_SESSION_BASE")]
    pub session_base: Option<String>,

    /// Timeout in seconds for the whole invocation (0 disables it)
    #[arg(long, env = "BEDROCK_AGENT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Do not request trace events from the agent
    #[arg(
        long,
        env = "BEDROCK_AGENT_NO_TRACE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub no_trace: bool,

    /// Guardrail check interval used while streaming
    #[arg(long, env = "BEDROCK_AGENT_GUARDRAIL_INTERVAL")]
    pub guardrail_interval: Option<i32>,

    /// Only stream the final response instead of incremental chunks
    #[arg(long)]
    pub stream_final_response: bool,

    /// Ask this question instead of prompting for one
    #[arg(short, long, env = "BEDROCK_AGENT_PROMPT")]
    pub prompt: Option<String>,

    /// Print without colors
    #[arg(
        long,
        env = "BEDROCK_AGENT_PLAIN",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub plain: bool,
}
