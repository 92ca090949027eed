use std::process::ExitCode;

use bedrock_agent::agent::BedrockAgentRuntime;
use bedrock_agent::app;
use bedrock_agent::cli::Cli;
use bedrock_agent::config::AgentSettings;
use bedrock_agent::display::{OutputStyle, Presenter};
use bedrock_agent::error::EXIT_OK;
use bedrock_agent::prompt::TerminalReader;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "bedrock_agent=info,warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env before parsing so its values reach clap's env bindings
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("{:#}", e);
    }
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let style = if cli.plain {
        OutputStyle::Plain
    } else {
        OutputStyle::Decorated
    };
    let mut presenter = Presenter::stdout(style);
    let mut reader = TerminalReader::new();

    let connect = |agent: AgentSettings| async move { BedrockAgentRuntime::connect(&agent).await };

    match app::run(&cli, connect, &mut reader, &mut presenter).await {
        Ok(_) => ExitCode::from(EXIT_OK),
        Err(e) => ExitCode::from(&e),
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
