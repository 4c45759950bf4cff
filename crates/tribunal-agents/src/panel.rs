//! Three-round panel runner: initial stances, cross-examination, consensus.

use chrono::Utc;
use deliberation::panel::{
    other_arguments_text, own_stance_text, round1_summary, round2_summary, ConsensusResult,
    CrossExamReply, CrossExamResponse, InitialStance, PanelRounds, PanelTranscript, Panelist,
    StanceReply, StanceUpdate, MODERATOR,
};
use deliberation::Case;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::batch::BatchReport;
use crate::errors::AgentError;
use crate::llm::{call_json, ChatBackend, ChatRequest};
use crate::prompts;

pub struct PanelRunner<'a> {
    backend: &'a dyn ChatBackend,
    model: String,
    temperature: f64,
}

impl<'a> PanelRunner<'a> {
    pub fn new(backend: &'a dyn ChatBackend, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature,
        }
    }

    pub async fn run_case(&self, case: &Case) -> Result<PanelTranscript, AgentError> {
        info!(case_id = case.id, model = %self.model, "panel debate starting");

        let stances = self.initial_stances(case).await?;
        let (exchanges, updates) = self.cross_examination(case, &stances).await?;
        let consensus = self.consensus(case, &stances, &exchanges).await?;

        info!(
            case_id = case.id,
            verdict = %consensus.final_verdict,
            confidence = consensus.confidence,
            "panel reached consensus"
        );

        Ok(PanelTranscript {
            case_id: case.id,
            claim: case.claim.clone(),
            truth: case.truth.clone(),
            timestamp: Utc::now(),
            model: self.model.clone(),
            rounds: PanelRounds {
                round1_initial_stances: stances,
                round2_cross_examination: exchanges,
                round2_stance_updates: updates,
                round3_consensus: consensus,
            },
        })
    }

    /// Run cases in order. Failed cases are logged and skipped.
    pub async fn run_cases<F>(&self, cases: &[&Case], mut on_result: F) -> BatchReport<PanelTranscript>
    where
        F: FnMut(&PanelTranscript),
    {
        let mut report = BatchReport::default();
        for case in cases {
            match self.run_case(case).await {
                Ok(transcript) => {
                    on_result(&transcript);
                    report.completed.push(transcript);
                }
                Err(err) => {
                    error!(case_id = case.id, error = %err, "panel debate failed; continuing with next case");
                    report.fail(case.id, err);
                }
            }
        }
        report
    }

    async fn initial_stances(&self, case: &Case) -> Result<Vec<InitialStance>, AgentError> {
        let user = prompts::initial_stance_user(case);
        let mut stances = Vec::with_capacity(Panelist::ALL.len());
        for panelist in Panelist::ALL {
            info!(case_id = case.id, round = 1, agent = panelist.name(), "calling panelist");
            let reply: StanceReply = self
                .ask(panelist.name(), prompts::stance_system(panelist), user.clone())
                .await?;
            stances.push(reply.into_stance(panelist));
        }
        Ok(stances)
    }

    async fn cross_examination(
        &self,
        case: &Case,
        stances: &[InitialStance],
    ) -> Result<(Vec<CrossExamResponse>, Vec<StanceUpdate>), AgentError> {
        let mut exchanges = Vec::new();
        let mut updates = Vec::new();
        for stance in stances {
            let panelist = stance.agent;
            info!(case_id = case.id, round = 2, agent = panelist.name(), "calling panelist");
            let system = prompts::cross_exam_system(
                panelist,
                &own_stance_text(stance),
                &other_arguments_text(stances, panelist),
            );
            let reply: CrossExamReply = self
                .ask(panelist.name(), &system, prompts::cross_exam_user(case))
                .await?;
            let (responses, update) = reply.into_exchanges(panelist);
            exchanges.extend(responses);
            updates.push(update);
        }
        Ok((exchanges, updates))
    }

    async fn consensus(
        &self,
        case: &Case,
        stances: &[InitialStance],
        exchanges: &[CrossExamResponse],
    ) -> Result<ConsensusResult, AgentError> {
        info!(case_id = case.id, round = 3, agent = MODERATOR, "calling moderator");
        let system = prompts::moderator_system(case, &round1_summary(stances), &round2_summary(exchanges));
        self.ask(MODERATOR, &system, prompts::MODERATOR_USER.to_string())
            .await
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        agent: &str,
        system: &str,
        user: String,
    ) -> Result<T, AgentError> {
        let request = ChatRequest::new(&self.model, system, user, self.temperature);
        let (value, _raw) = call_json(self.backend, &request)
            .await
            .map_err(|source| AgentError::llm(agent, source))?;
        serde_json::from_value(value).map_err(|source| AgentError::Reply {
            agent: agent.to_string(),
            source,
        })
    }
}
