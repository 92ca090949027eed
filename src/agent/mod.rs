//! Agent invocation
//!
//! Builds an invocation request, submits it through an [`AgentRuntime`] and
//! folds the streamed response into the final answer:
//! - [`domain`]: request, session id and the two-variant [`StreamEvent`]
//! - [`stream`]: ordered consumption of the response stream
//! - [`invoker`]: the invocation routine with its timeout
//! - [`bedrock`]: the AWS Bedrock agent runtime backend

pub mod bedrock;
pub mod domain;
pub mod error;
pub mod invoker;
pub mod stream;

pub use bedrock::BedrockAgentRuntime;
pub use domain::{InvocationRequest, SessionId, StreamEvent, StreamingOptions, TraceField};
pub use error::{InvocationError, InvocationResult};
pub use invoker::AgentInvoker;
pub use stream::{collect_completion, CompletionAccumulator, EventStream};

use async_trait::async_trait;

/// A remote service able to run an agent invocation
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Submit the request and return its response stream
    async fn invoke_agent(&self, request: InvocationRequest) -> InvocationResult<EventStream>;
}
