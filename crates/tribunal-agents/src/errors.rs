//! Error taxonomy for agent runs.
//!
//! A failed call or an unusable reply fails the case it belongs to; the
//! batch drivers log it and move on to the next case.

use std::path::PathBuf;

use deliberation::tribunal::TribunalError;
use deliberation::{CaseError, ExportError};
use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum AgentError {
    // ── Configuration ─────────────────────────────────────────────────────
    #[error("no API key: set OPENAI_API_KEY, pass --api-key, or add api_key to the config file")]
    MissingApiKey,

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    // ── Per-case failures ─────────────────────────────────────────────────
    #[error("{agent} call failed: {source}")]
    Llm {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("{agent} reply did not match the expected shape: {source}")]
    Reply {
        agent: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tribunal protocol error: {0}")]
    Protocol(#[from] TribunalError),

    #[error("case {0} ended without a verdict")]
    NoVerdict(usize),

    // ── Data and output ───────────────────────────────────────────────────
    #[error(transparent)]
    Cases(#[from] CaseError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AgentError {
    pub fn llm(agent: impl Into<String>, source: LlmError) -> Self {
        Self::Llm {
            agent: agent.into(),
            source,
        }
    }

    /// Whether this error belongs to a single case rather than the whole run.
    pub fn is_case_failure(&self) -> bool {
        matches!(
            self,
            Self::Llm { .. } | Self::Reply { .. } | Self::Protocol(_) | Self::NoVerdict(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_names_agent() {
        let err = AgentError::llm(
            "Defense (Counter)",
            LlmError::Api {
                status: 500,
                body: "upstream".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Defense (Counter) call failed: API error (500): upstream"
        );
        assert!(err.is_case_failure());
    }

    #[test]
    fn test_configuration_errors_are_run_level() {
        assert!(!AgentError::MissingApiKey.is_case_failure());
        assert!(!AgentError::Configuration("bad".into()).is_case_failure());
        assert!(AgentError::NoVerdict(3).is_case_failure());
    }
}
