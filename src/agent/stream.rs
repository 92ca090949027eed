//! Response stream consumption

use std::pin::Pin;

use futures::{Stream, StreamExt};
use tracing::info;

use super::domain::StreamEvent;
use super::error::InvocationResult;

/// Ordered stream of events returned by an agent invocation
pub type EventStream = Pin<Box<dyn Stream<Item = InvocationResult<StreamEvent>> + Send>>;

/// Accumulator for building the final answer from stream events
#[derive(Debug, Default)]
pub struct CompletionAccumulator {
    text: String,
    chunks: usize,
    traces: usize,
}

impl CompletionAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Chunks extend the answer, traces are only logged.
    ///
    /// Each chunk is decoded on its own, so a multibyte character split across
    /// two chunks fails with `InvocationError::Decode`.
    pub fn apply(&mut self, event: StreamEvent) -> InvocationResult<()> {
        match event {
            StreamEvent::Chunk(bytes) => {
                let text = String::from_utf8(bytes)?;
                self.text.push_str(&text);
                self.chunks += 1;
            }
            StreamEvent::Trace(fields) => {
                for field in &fields {
                    info!("Trace - {}: {}", field.key, field.value);
                }
                self.traces += 1;
            }
        }
        Ok(())
    }

    /// Number of chunk events applied so far
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Number of trace events applied so far
    pub fn trace_count(&self) -> usize {
        self.traces
    }

    /// Build the final answer
    pub fn finish(self) -> String {
        self.text
    }
}

/// Drain the stream in order and return the concatenated answer.
///
/// The first error aborts consumption and whatever was accumulated is dropped.
pub async fn collect_completion(mut events: EventStream) -> InvocationResult<String> {
    let mut accumulator = CompletionAccumulator::new();

    while let Some(event) = events.next().await {
        accumulator.apply(event?)?;
    }

    tracing::debug!(
        chunks = accumulator.chunk_count(),
        traces = accumulator.trace_count(),
        "Agent response stream finished"
    );

    Ok(accumulator.finish())
}
