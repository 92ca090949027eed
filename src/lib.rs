//! # bedrock-agent
//!
//! Ask a question to an AWS Bedrock agent, stream back its answer and print it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bedrock_agent::agent::{AgentInvoker, BedrockAgentRuntime, SessionId};
//! use bedrock_agent::config::AgentSettings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = AgentSettings {
//!         agent_id: "AGENT123".to_string(),
//!         alias_id: "ALIAS456".to_string(),
//!         ..Default::default()
//!     };
//!     let runtime = BedrockAgentRuntime::connect(&settings).await?;
//!     let invoker = AgentInvoker::new(runtime, settings.clone());
//!
//!     let session = SessionId::generate(&settings.session_base);
//!     let answer = invoker.invoke("What is Medicare Advantage?", &session).await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - **agent**: request building, stream consumption and the Bedrock backend
//! - **config**: CLI, environment and file configuration with validation
//! - **display** / **prompt**: terminal presentation and question input
//! - **app**: the end-to-end demo flow

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod prompt;
