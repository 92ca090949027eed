//! Domain types for agent invocation

use std::fmt;

use uuid::Uuid;

/// Base used for session ids when none is configured
pub const DEFAULT_SESSION_BASE: &str = "demo-session-123";

/// Number of random hex characters appended to the session base
const SESSION_SUFFIX_LEN: usize = 8;

/// Opaque identifier correlating the turns of one conversation server-side
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session id: `<base>-<8 random hex chars>`
    pub fn generate(base: &str) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", base, &suffix[..SESSION_SUFFIX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Streaming behaviour requested from the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingOptions {
    /// How often (in stream units) guardrails are re-applied
    pub guardrail_interval: i32,
    /// Buffer the answer until it is complete instead of streaming chunks
    pub stream_final_response: bool,
}

impl Default for StreamingOptions {
    fn default() -> Self {
        Self {
            guardrail_interval: 20,
            stream_final_response: false,
        }
    }
}

/// A single agent invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub session_id: SessionId,
    pub input_text: String,
    pub streaming: StreamingOptions,
    pub enable_trace: bool,
}

/// One diagnostic field of a trace event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceField {
    pub key: String,
    pub value: String,
}

impl TraceField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An event from the agent's response stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Fragment of the answer, as raw UTF-8 bytes
    Chunk(Vec<u8>),
    /// Diagnostic metadata about the agent's reasoning; never part of the answer
    Trace(Vec<TraceField>),
}

impl StreamEvent {
    /// Create a chunk event from text
    pub fn text(content: impl Into<String>) -> Self {
        StreamEvent::Chunk(content.into().into_bytes())
    }

    /// Create a trace event with a single field
    pub fn trace(key: impl Into<String>, value: impl Into<String>) -> Self {
        StreamEvent::Trace(vec![TraceField::new(key, value)])
    }
}
