//! The demo flow: validate configuration, connect, ask, invoke, print

use std::future::Future;
use std::io::Write;

use tracing::error;

use crate::agent::{AgentInvoker, AgentRuntime, SessionId};
use crate::cli::Cli;
use crate::config::{AgentSettings, Settings};
use crate::display::{Presenter, Tone};
use crate::error::DemoError;
use crate::prompt::{ask_question, LineReader, PromptOutcome};

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed { session_id: SessionId, answer: String },
    /// The user cancelled at the prompt
    Cancelled,
}

/// Run the demo once.
///
/// `connect` builds the agent runtime from the validated settings; it is only
/// called after configuration has been validated, so a configuration error
/// never reaches the network. Every failure is printed before it is returned.
pub async fn run<C, Fut, R, L, W>(
    cli: &Cli,
    connect: C,
    reader: &mut L,
    presenter: &mut Presenter<W>,
) -> Result<Outcome, DemoError>
where
    C: FnOnce(AgentSettings) -> Fut,
    Fut: Future<Output = anyhow::Result<R>>,
    R: AgentRuntime,
    L: LineReader + ?Sized,
    W: Write,
{
    presenter.section_header("AWS BEDROCK AGENT DEMO", Tone::Magenta)?;

    presenter.step(1, "Validating Configuration")?;
    let settings = match Settings::from_cli(cli) {
        Ok(settings) => settings,
        Err(e) => {
            presenter.error(&e.to_string())?;
            return Err(e.into());
        }
    };
    presenter.set_style(settings.display.style);

    presenter.success(&format!("Agent ID: {}", settings.agent.agent_id))?;
    presenter.success(&format!("Alias ID: {}", settings.agent.alias_id))?;
    presenter.success(&format!(
        "Region: {}",
        settings
            .agent
            .region
            .as_deref()
            .unwrap_or("(AWS SDK default chain)")
    ))?;

    presenter.step(2, "Initializing AWS Bedrock Agent Runtime Client")?;
    let runtime = match connect(settings.agent.clone()).await {
        Ok(runtime) => runtime,
        Err(e) => {
            let err = DemoError::ClientInitialization(e);
            presenter.error(&err.to_string())?;
            return Err(err);
        }
    };
    presenter.success("AWS Bedrock Agent Runtime client initialized successfully")?;

    presenter.step(3, "Getting User Question")?;
    let question = match ask_question(&settings.display.prompt, reader, presenter)? {
        PromptOutcome::Question(question) => question,
        PromptOutcome::Cancelled => return Ok(Outcome::Cancelled),
    };
    let session_id = SessionId::generate(&settings.agent.session_base);
    presenter.info(&format!("Question: {}", question))?;
    presenter.info(&format!("Session ID: {}", session_id))?;

    presenter.step(4, "Invoking Bedrock Agent")?;
    presenter.info(&format!("Invoking Bedrock Agent: {}", settings.agent.agent_id))?;
    presenter.info(&format!("Using Alias: {}", settings.agent.alias_id))?;
    presenter.info(&format!("Session ID: {}", session_id))?;
    presenter.info("Processing agent response...")?;

    let invoker = AgentInvoker::new(runtime, settings.agent);
    let answer = match invoker.invoke(&question, &session_id).await {
        Ok(answer) => answer,
        Err(e) => {
            let err = DemoError::from(e);
            presenter.error(&err.to_string())?;
            error!("Demo failed: {}", err);
            return Err(err);
        }
    };

    presenter.step(5, "Agent Response")?;
    presenter.section_header("AGENT RESPONSE", Tone::Yellow)?;
    presenter.answer(&answer)?;
    presenter.success("Demo completed successfully!")?;

    Ok(Outcome::Completed { session_id, answer })
}
