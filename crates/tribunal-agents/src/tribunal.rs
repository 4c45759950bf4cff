//! Drives a [`TribunalOrchestrator`] with model calls.
//!
//! The orchestrator decides whose turn it is; this runner builds that
//! role's prompt from the latest briefs, calls the model, parses the brief,
//! and submits it. Any failure aborts the case's session.

use deliberation::tribunal::{
    DebateResult, DefenseBrief, EpistemicAnalysis, ForemanRuling, NextAction, ProsecutionBrief,
    TribunalOrchestrator, DEFAULT_ROUND_RANGE,
};
use deliberation::Case;
use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::batch::BatchReport;
use crate::errors::AgentError;
use crate::llm::{call_json, ChatBackend, ChatRequest};
use crate::prompts;

/// Number of rounds to use when the caller does not fix one.
pub fn random_rounds() -> u32 {
    rand::thread_rng().gen_range(DEFAULT_ROUND_RANGE)
}

pub struct TribunalRunner<'a> {
    backend: &'a dyn ChatBackend,
    model: String,
    temperature: f64,
}

impl<'a> TribunalRunner<'a> {
    pub fn new(backend: &'a dyn ChatBackend, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one full tribunal. `rounds` of `None` draws from 2..=4.
    pub async fn run_case(&self, case: &Case, rounds: Option<u32>) -> Result<DebateResult, AgentError> {
        let rounds = rounds.unwrap_or_else(random_rounds);
        let mut orch = TribunalOrchestrator::new(case.clone(), rounds);
        orch.start()?;
        info!(case_id = case.id, rounds = orch.session().planned_rounds, model = %self.model, "tribunal commencing");

        match self.drive(&mut orch).await {
            Ok(result) => {
                info!(
                    case_id = case.id,
                    verdict = %result.final_verdict,
                    confidence = result.confidence,
                    calls = result.llm_calls(),
                    "tribunal adjourned"
                );
                Ok(result)
            }
            Err(err) => {
                if !orch.is_complete() {
                    if let Err(abort_err) = orch.abort(&err.to_string()) {
                        warn!(case_id = case.id, error = %abort_err, "could not record abort");
                    }
                }
                Err(err)
            }
        }
    }

    /// Run cases in order. Failed cases are logged and skipped.
    pub async fn run_cases<F>(
        &self,
        cases: &[&Case],
        rounds: Option<u32>,
        mut on_result: F,
    ) -> BatchReport<DebateResult>
    where
        F: FnMut(&Case, &DebateResult),
    {
        let mut report = BatchReport::default();
        for case in cases {
            match self.run_case(case, rounds).await {
                Ok(result) => {
                    on_result(case, &result);
                    report.completed.push(result);
                }
                Err(err) => {
                    error!(case_id = case.id, error = %err, "tribunal failed; continuing with next case");
                    report.fail(case.id, err);
                }
            }
        }
        report
    }

    async fn drive(&self, orch: &mut TribunalOrchestrator) -> Result<DebateResult, AgentError> {
        loop {
            let next = orch.next_action();
            let Some(role) = next.role() else {
                break;
            };
            let label = role.call_label(orch.current_round());
            let round = orch.current_round();
            info!(case_id = orch.case().id, round, agent = label, "calling agent");

            match next {
                NextAction::AwaitProsecutor => {
                    let user = if orch.is_counter_round() {
                        prompts::prosecution_counter(
                            orch.case(),
                            &latest(orch.prosecution()),
                            &latest(orch.defense()),
                            &latest(orch.epistemology()),
                        )
                    } else {
                        prompts::prosecution_opening(orch.case())
                    };
                    let (brief, raw) = self
                        .ask::<ProsecutionBrief>(label, prompts::PROSECUTOR_SYSTEM, user)
                        .await?;
                    orch.submit_prosecution(brief, raw)?;
                }
                NextAction::AwaitDefense => {
                    let prosecution = latest(orch.prosecution());
                    let user = if orch.is_counter_round() {
                        prompts::defense_counter(
                            orch.case(),
                            &prosecution,
                            &latest(orch.defense()),
                            &latest(orch.epistemology()),
                        )
                    } else {
                        prompts::defense_opening(orch.case(), &prosecution)
                    };
                    let (brief, raw) = self
                        .ask::<DefenseBrief>(label, prompts::DEFENSE_SYSTEM, user)
                        .await?;
                    orch.submit_defense(brief, raw)?;
                }
                NextAction::AwaitEpistemologist => {
                    let user = prompts::epistemology(
                        orch.case(),
                        &latest(orch.prosecution()),
                        &latest(orch.defense()),
                    );
                    let (analysis, raw) = self
                        .ask::<EpistemicAnalysis>(label, prompts::EPISTEMOLOGIST_SYSTEM, user)
                        .await?;
                    orch.submit_epistemology(analysis, raw)?;
                }
                NextAction::AwaitForeman => {
                    let user = prompts::foreman(
                        orch.case(),
                        &latest(orch.prosecution()),
                        &latest(orch.defense()),
                        &latest(orch.epistemology()),
                    );
                    let (ruling, raw) = self
                        .ask::<ForemanRuling>(label, prompts::JURY_FOREMAN_SYSTEM, user)
                        .await?;
                    orch.submit_ruling(ruling, raw)?;
                }
                NextAction::Complete => break,
            }
        }

        orch.outcome().ok_or(AgentError::NoVerdict(orch.case().id))
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        agent: &str,
        system: &str,
        user: String,
    ) -> Result<(T, String), AgentError> {
        let request = ChatRequest::new(&self.model, system, user, self.temperature);
        let (value, raw) = call_json(self.backend, &request)
            .await
            .map_err(|source| AgentError::llm(agent, source))?;
        let parsed = serde_json::from_value(value).map_err(|source| AgentError::Reply {
            agent: agent.to_string(),
            source,
        })?;
        Ok((parsed, raw))
    }
}

/// The latest brief of a role, or an empty one before it has spoken.
fn latest<T: Clone + Default>(brief: Option<&T>) -> T {
    brief.cloned().unwrap_or_default()
}
