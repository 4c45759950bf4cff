//! Model-backed agents for the claim-verification jury.
//!
//! `deliberation` owns the protocols and records; this crate supplies the
//! chat client, the prompts, the runners that feed model replies into the
//! protocols, the configuration layer, and the `tribunal` CLI.

pub mod baseline;
pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod panel;
pub mod prompts;
pub mod tribunal;

pub use baseline::BaselineVerifier;
pub use batch::{BatchReport, CaseFailure};
pub use config::{CliOverrides, JuryConfig, ModelProfile};
pub use errors::AgentError;
pub use llm::{call_json, ChatBackend, ChatMessage, ChatRequest, LlmError, OpenAiChat};
pub use panel::PanelRunner;
pub use tribunal::{random_rounds, TribunalRunner};
