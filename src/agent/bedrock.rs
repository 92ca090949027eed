//! AWS Bedrock agent runtime backend

use std::fmt;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::{
    GuardrailAction, InvocationInput, InvocationType, ModelInvocationInput, Observation,
    OrchestrationTrace, PostProcessingTrace, PreProcessingTrace, PromptType, ResponseStream,
    RoutingClassifierTrace, StreamingConfigurations, Trace, TracePart, Type as ObservationType,
};
use aws_sdk_bedrockagentruntime::Client as AgentRuntimeClient;
use tracing::debug;

use super::domain::{InvocationRequest, StreamEvent, TraceField};
use super::error::{InvocationError, InvocationResult};
use super::stream::EventStream;
use super::AgentRuntime;
use crate::config::AgentSettings;

/// Agent runtime backed by the `bedrock-agent-runtime` service
pub struct BedrockAgentRuntime {
    client: AgentRuntimeClient,
}

impl BedrockAgentRuntime {
    /// Build a client for the region and endpoint in `settings`
    pub async fn connect(settings: &AgentSettings) -> anyhow::Result<Self> {
        let sdk_config = Self::build_aws_config(settings).await;

        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no AWS region configured; set AWS_REGION, pass --region or configure a profile"
                )
            })?;

        let client = AgentRuntimeClient::new(&sdk_config);
        debug!(region = %region, "Bedrock agent runtime client created");

        Ok(Self { client })
    }

    /// Build AWS SDK configuration with optional region and custom endpoint
    async fn build_aws_config(settings: &AgentSettings) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
            debug!(endpoint = %endpoint, "Using custom Bedrock endpoint");
        }

        loader.load().await
    }
}

#[async_trait]
impl AgentRuntime for BedrockAgentRuntime {
    fn name(&self) -> &str {
        "bedrock-agent-runtime"
    }

    async fn invoke_agent(&self, request: InvocationRequest) -> InvocationResult<EventStream> {
        let streaming = StreamingConfigurations::builder()
            .apply_guardrail_interval(request.streaming.guardrail_interval)
            .stream_final_response(request.streaming.stream_final_response)
            .build();

        let output = self
            .client
            .invoke_agent()
            .agent_id(request.agent_id)
            .agent_alias_id(request.agent_alias_id)
            .session_id(request.session_id.as_str())
            .input_text(request.input_text)
            .enable_trace(request.enable_trace)
            .streaming_configurations(streaming)
            .send()
            .await
            .map_err(|e| InvocationError::Request(DisplayErrorContext(&e).to_string()))?;

        // Pull events one at a time; the receiver is dropped after the first error.
        let events = futures::stream::unfold(Some(output.completion), |state| async move {
            let Some(mut receiver) = state else {
                return None;
            };
            loop {
                match receiver.recv().await {
                    Ok(Some(event)) => {
                        if let Some(item) = convert_event(event) {
                            return Some((item, Some(receiver)));
                        }
                    }
                    Ok(None) => return None,
                    Err(e) => {
                        let err = InvocationError::Stream(DisplayErrorContext(&e).to_string());
                        return Some((Err(err), None));
                    }
                }
            }
        });

        Ok(Box::pin(events))
    }
}

/// Map an SDK stream event onto a [`StreamEvent`]; `None` for kinds the demo ignores
fn convert_event(event: ResponseStream) -> Option<InvocationResult<StreamEvent>> {
    match event {
        ResponseStream::Chunk(part) => Some(
            part.bytes
                .map(|blob| StreamEvent::Chunk(blob.into_inner()))
                .ok_or_else(|| {
                    InvocationError::MalformedEvent("chunk event without a byte payload".to_string())
                }),
        ),
        ResponseStream::Trace(part) => Some(trace_fields(&part).map(StreamEvent::Trace)),
        ResponseStream::ReturnControl(_) => {
            debug!(kind = "returnControl", "Skipping unsupported response stream event");
            None
        }
        ResponseStream::Files(_) => {
            debug!(kind = "files", "Skipping unsupported response stream event");
            None
        }
        _ => {
            debug!(kind = UNKNOWN, "Skipping unsupported response stream event");
            None
        }
    }
}

fn trace_fields(part: &TracePart) -> InvocationResult<Vec<TraceField>> {
    let trace = part.trace().ok_or_else(|| {
        InvocationError::MalformedEvent("trace event without a trace body".to_string())
    })?;

    Ok(vec![TraceField::new(trace_kind(trace), trace_value(trace))])
}

const UNKNOWN: &str = "unknown";

/// Trace kind as the service names it on the wire
fn trace_kind(trace: &Trace) -> &'static str {
    match trace {
        Trace::OrchestrationTrace(_) => "orchestrationTrace",
        Trace::PreProcessingTrace(_) => "preProcessingTrace",
        Trace::PostProcessingTrace(_) => "postProcessingTrace",
        Trace::FailureTrace(_) => "failureTrace",
        Trace::GuardrailTrace(_) => "guardrailTrace",
        Trace::RoutingClassifierTrace(_) => "routingClassifierTrace",
        Trace::CustomOrchestrationTrace(_) => "customOrchestrationTrace",
        _ => UNKNOWN,
    }
}

/// Render a trace body from its fields.
///
/// The SDK redacts `Debug` output for every trace type, so values are read
/// through the accessors instead.
fn trace_value(trace: &Trace) -> String {
    let details = match trace {
        Trace::OrchestrationTrace(t) => match t {
            OrchestrationTrace::Rationale(r) => Details::new("rationale").field("text", r.text()),
            OrchestrationTrace::InvocationInput(i) => invocation_input(i),
            OrchestrationTrace::ModelInvocationInput(m) => model_input(m),
            OrchestrationTrace::ModelInvocationOutput(o) => Details::new("modelInvocationOutput")
                .field("rawResponse", o.raw_response().and_then(|r| r.content())),
            OrchestrationTrace::Observation(o) => observation(o),
            _ => Details::new(UNKNOWN),
        },
        Trace::PreProcessingTrace(t) => match t {
            PreProcessingTrace::ModelInvocationInput(m) => model_input(m),
            PreProcessingTrace::ModelInvocationOutput(o) => {
                let parsed = o.parsed_response();
                Details::new("modelInvocationOutput")
                    .field("rationale", parsed.and_then(|p| p.rationale()))
                    .field("isValid", parsed.and_then(|p| p.is_valid()))
                    .field("rawResponse", o.raw_response().and_then(|r| r.content()))
            }
            _ => Details::new(UNKNOWN),
        },
        Trace::PostProcessingTrace(t) => match t {
            PostProcessingTrace::ModelInvocationInput(m) => model_input(m),
            PostProcessingTrace::ModelInvocationOutput(o) => Details::new("modelInvocationOutput")
                .field("text", o.parsed_response().and_then(|p| p.text()))
                .field("rawResponse", o.raw_response().and_then(|r| r.content())),
            _ => Details::new(UNKNOWN),
        },
        Trace::FailureTrace(f) => Details::new("failure")
            .field("reason", f.failure_reason())
            .field("code", f.failure_code()),
        Trace::GuardrailTrace(g) => Details::new("guardrail")
            .field("action", g.action().map(GuardrailAction::as_str))
            .field("inputAssessments", Some(g.input_assessments().len()))
            .field("outputAssessments", Some(g.output_assessments().len())),
        Trace::RoutingClassifierTrace(t) => match t {
            RoutingClassifierTrace::InvocationInput(i) => invocation_input(i),
            RoutingClassifierTrace::ModelInvocationInput(m) => model_input(m),
            RoutingClassifierTrace::ModelInvocationOutput(o) => Details::new("modelInvocationOutput")
                .field("rawResponse", o.raw_response().and_then(|r| r.content())),
            RoutingClassifierTrace::Observation(o) => observation(o),
            _ => Details::new(UNKNOWN),
        },
        Trace::CustomOrchestrationTrace(c) => {
            Details::new("event").field("text", c.event().and_then(|e| e.text()))
        }
        _ => Details::new(UNKNOWN),
    };
    details.render()
}

fn invocation_input(input: &InvocationInput) -> Details {
    let action_group = input.action_group_invocation_input();
    let knowledge_base = input.knowledge_base_lookup_input();
    Details::new("invocationInput")
        .field("invocationType", input.invocation_type().map(InvocationType::as_str))
        .field("actionGroup", action_group.and_then(|a| a.action_group_name()))
        .field("function", action_group.and_then(|a| a.function()))
        .field("apiPath", action_group.and_then(|a| a.api_path()))
        .field("knowledgeBaseId", knowledge_base.and_then(|k| k.knowledge_base_id()))
        .field("query", knowledge_base.and_then(|k| k.text()))
}

fn model_input(input: &ModelInvocationInput) -> Details {
    Details::new("modelInvocationInput")
        .field("type", input.r#type().map(PromptType::as_str))
        .field("foundationModel", input.foundation_model())
        .field("text", input.text())
}

fn observation(observation: &Observation) -> Details {
    Details::new("observation")
        .field("type", observation.r#type().map(ObservationType::as_str))
        .field(
            "actionGroupOutput",
            observation.action_group_invocation_output().and_then(|a| a.text()),
        )
        .field(
            "retrievedReferences",
            observation
                .knowledge_base_lookup_output()
                .map(|k| k.retrieved_references().len()),
        )
        .field("finalResponse", observation.final_response().and_then(|f| f.text()))
}

/// `label: name=value, ...` with absent fields left out
struct Details {
    label: &'static str,
    fields: Vec<String>,
}

impl Details {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            fields: Vec::new(),
        }
    }

    fn field<T: fmt::Debug>(mut self, name: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.fields.push(format!("{}={:?}", name, value));
        }
        self
    }

    fn render(self) -> String {
        if self.fields.is_empty() {
            self.label.to_string()
        } else {
            format!("{}: {}", self.label, self.fields.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockagentruntime::primitives::Blob;
    use aws_sdk_bedrockagentruntime::types::{
        CustomOrchestrationTrace, FailureTrace, FilePart, FinalResponse, GuardrailTrace,
        PayloadPart, PostProcessingModelInvocationOutput, PostProcessingParsedResponse,
        PreProcessingModelInvocationOutput, PreProcessingParsedResponse, Rationale,
        ReturnControlPayload,
    };

    #[test]
    fn test_chunk_event_keeps_bytes() {
        let part = PayloadPart::builder().bytes(Blob::new("Hello")).build();
        let event = convert_event(ResponseStream::Chunk(part)).unwrap().unwrap();
        assert_eq!(event, StreamEvent::Chunk(b"Hello".to_vec()));
    }

    #[test]
    fn test_chunk_without_bytes_is_malformed() {
        let part = PayloadPart::builder().build();
        let result = convert_event(ResponseStream::Chunk(part)).unwrap();
        assert!(matches!(result, Err(InvocationError::MalformedEvent(_))));
    }

    fn field_for(trace: Trace) -> TraceField {
        let part = TracePart::builder().trace(trace).build();
        match convert_event(ResponseStream::Trace(part)).unwrap().unwrap() {
            StreamEvent::Trace(mut fields) => {
                assert_eq!(fields.len(), 1);
                fields.remove(0)
            }
            StreamEvent::Chunk(_) => panic!("expected a trace event"),
        }
    }

    #[test]
    fn test_failure_trace_carries_reason() {
        let failure = FailureTrace::builder()
            .failure_reason("throttled")
            .failure_code(429)
            .build();

        let field = field_for(Trace::FailureTrace(failure));
        assert_eq!(field.key, "failureTrace");
        assert_eq!(field.value, r#"failure: reason="throttled", code=429"#);
    }

    #[test]
    fn test_orchestration_rationale_is_readable() {
        let rationale = Rationale::builder().text("I will search the KB").build();

        let field = field_for(Trace::OrchestrationTrace(OrchestrationTrace::Rationale(rationale)));
        assert_eq!(field.key, "orchestrationTrace");
        assert_eq!(field.value, r#"rationale: text="I will search the KB""#);
        assert!(!field.value.contains("Redacted"));
    }

    #[test]
    fn test_guardrail_trace_reports_action() {
        let guardrail = GuardrailTrace::builder()
            .action(GuardrailAction::Intervened)
            .build();

        let field = field_for(Trace::GuardrailTrace(guardrail));
        assert_eq!(field.key, "guardrailTrace");
        assert!(field.value.contains(r#"action="INTERVENED""#));
        assert!(field.value.contains("inputAssessments=0"));
    }

    #[test]
    fn test_pre_and_post_processing_outputs() {
        let parsed = PreProcessingParsedResponse::builder()
            .rationale("The question is about Medicare")
            .is_valid(true)
            .build();
        let pre = PreProcessingModelInvocationOutput::builder()
            .parsed_response(parsed)
            .build();
        let field = field_for(Trace::PreProcessingTrace(
            PreProcessingTrace::ModelInvocationOutput(pre),
        ));
        assert_eq!(field.key, "preProcessingTrace");
        assert!(field.value.contains(r#"rationale="The question is about Medicare""#));
        assert!(field.value.contains("isValid=true"));

        let parsed = PostProcessingParsedResponse::builder()
            .text("Medicare Advantage bundles coverage.")
            .build();
        let post = PostProcessingModelInvocationOutput::builder()
            .parsed_response(parsed)
            .build();
        let field = field_for(Trace::PostProcessingTrace(
            PostProcessingTrace::ModelInvocationOutput(post),
        ));
        assert_eq!(field.key, "postProcessingTrace");
        assert!(field.value.contains("Medicare Advantage bundles coverage."));
    }

    #[test]
    fn test_less_common_kinds_have_fixed_names() {
        let observation = Observation::builder()
            .final_response(FinalResponse::builder().text("Done").build())
            .build();
        let field = field_for(Trace::RoutingClassifierTrace(
            RoutingClassifierTrace::Observation(observation),
        ));
        assert_eq!(field.key, "routingClassifierTrace");
        assert_eq!(field.value, r#"observation: finalResponse="Done""#);

        let field = field_for(Trace::CustomOrchestrationTrace(
            CustomOrchestrationTrace::builder().build(),
        ));
        assert_eq!(field.key, "customOrchestrationTrace");
        assert_eq!(field.value, "event");
    }

    #[test]
    fn test_return_control_and_files_are_skipped() {
        let payload = ReturnControlPayload::builder().invocation_id("inv-1").build();
        assert!(convert_event(ResponseStream::ReturnControl(payload)).is_none());
        assert!(convert_event(ResponseStream::Files(FilePart::builder().build())).is_none());
    }

    #[test]
    fn test_trace_without_body_is_malformed() {
        let part = TracePart::builder().build();
        let result = convert_event(ResponseStream::Trace(part)).unwrap();
        assert!(matches!(result, Err(InvocationError::MalformedEvent(_))));
    }
}
