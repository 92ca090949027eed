//! The agent invocation routine

use std::time::Duration;

use tracing::{debug, info};

use super::domain::{InvocationRequest, SessionId};
use super::error::{InvocationError, InvocationResult};
use super::stream::collect_completion;
use super::AgentRuntime;
use crate::config::AgentSettings;

/// Invokes one configured agent and returns its complete answer
pub struct AgentInvoker<R> {
    runtime: R,
    settings: AgentSettings,
}

impl<R: AgentRuntime> AgentInvoker<R> {
    /// Create a new invoker for the agent described by `settings`
    pub fn new(runtime: R, settings: AgentSettings) -> Self {
        Self { runtime, settings }
    }

    /// Build the request for one turn
    pub fn request(&self, prompt: &str, session_id: &SessionId) -> InvocationResult<InvocationRequest> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(InvocationError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }

        Ok(InvocationRequest {
            agent_id: self.settings.agent_id.clone(),
            agent_alias_id: self.settings.alias_id.clone(),
            session_id: session_id.clone(),
            input_text: prompt.to_string(),
            streaming: self.settings.streaming,
            enable_trace: self.settings.enable_trace,
        })
    }

    /// Send `prompt` to the agent and wait for the full streamed answer.
    ///
    /// Any failure, including one in the middle of the stream, is returned as
    /// is; nothing is retried and no partial answer survives.
    pub async fn invoke(&self, prompt: &str, session_id: &SessionId) -> InvocationResult<String> {
        let request = self.request(prompt, session_id)?;

        info!(
            backend = self.runtime.name(),
            agent_id = %request.agent_id,
            alias_id = %request.agent_alias_id,
            session_id = %request.session_id,
            "Invoking agent"
        );

        let exchange = async {
            let events = self.runtime.invoke_agent(request).await?;
            collect_completion(events).await
        };

        let completion = match self.settings.timeout_secs {
            0 => exchange.await?,
            secs => tokio::time::timeout(Duration::from_secs(secs), exchange)
                .await
                .map_err(|_| InvocationError::Timeout(secs))??,
        };

        debug!(length = completion.len(), "Agent invocation completed");
        Ok(completion)
    }
}
