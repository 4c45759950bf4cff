//! Single-agent verifier: one direct call per case, used as the comparison
//! point for the tribunal.

use deliberation::{BaselineResult, Case};
use tracing::{error, info};

use crate::batch::BatchReport;
use crate::errors::AgentError;
use crate::llm::{call_json, ChatBackend, ChatRequest};
use crate::prompts;

const AGENT: &str = "Single Agent";

pub struct BaselineVerifier<'a> {
    backend: &'a dyn ChatBackend,
    model: String,
    temperature: f64,
}

impl<'a> BaselineVerifier<'a> {
    pub fn new(backend: &'a dyn ChatBackend, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature,
        }
    }

    pub async fn verify(&self, case: &Case) -> Result<BaselineResult, AgentError> {
        info!(case_id = case.id, model = %self.model, "single-agent verification");
        let request = ChatRequest::new(
            &self.model,
            prompts::SINGLE_AGENT_SYSTEM,
            prompts::baseline_user(case),
            self.temperature,
        );
        let (value, _raw) = call_json(self.backend, &request)
            .await
            .map_err(|source| AgentError::llm(AGENT, source))?;
        let result = BaselineResult::from_reply(case, value);
        info!(case_id = case.id, verdict = %result.verdict, confidence = result.confidence, "single-agent verdict");
        Ok(result)
    }

    /// Verify cases in order. Failed cases are logged and skipped.
    pub async fn verify_cases<F>(&self, cases: &[&Case], mut on_result: F) -> BatchReport<BaselineResult>
    where
        F: FnMut(&BaselineResult),
    {
        let mut report = BatchReport::default();
        for case in cases {
            match self.verify(case).await {
                Ok(result) => {
                    on_result(&result);
                    report.completed.push(result);
                }
                Err(err) => {
                    error!(case_id = case.id, error = %err, "verification failed; continuing with next case");
                    report.fail(case.id, err);
                }
            }
        }
        report
    }
}
