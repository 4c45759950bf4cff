//! Tribunal output records: the raw call log and the per-case result.

use serde::{Deserialize, Serialize};

use super::briefs::{DefenseBrief, EpistemicAnalysis, ForemanRuling, ProsecutionBrief};
use crate::verdict::{MutationType, Verdict};

/// One model call as it happened: who was asked and the raw reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub agent: String,
    pub response: String,
}

impl CallRecord {
    pub fn new(agent: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            response: response.into(),
        }
    }

    /// The response pretty-printed when it is valid JSON, verbatim otherwise.
    pub fn pretty_response(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.response)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| self.response.clone())
    }
}

/// A role's final position flattened to arguments and evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_name: String,
    pub arguments: Vec<String>,
    pub evidence: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub mutation_types: Vec<MutationType>,
}

impl AgentResponse {
    pub fn from_prosecution(brief: &ProsecutionBrief) -> Self {
        Self {
            agent_name: "Prosecutor".to_string(),
            arguments: brief
                .accusations
                .iter()
                .map(|a| a.explanation.clone())
                .collect(),
            evidence: brief
                .accusations
                .iter()
                .map(|a| a.evidence.clone())
                .collect(),
            confidence: brief.confidence,
            mutation_types: brief
                .accusations
                .iter()
                .map(|a| a.mutation_type())
                .collect(),
        }
    }

    pub fn from_defense(brief: &DefenseBrief) -> Self {
        Self {
            agent_name: "Defense".to_string(),
            arguments: brief
                .rebuttals
                .iter()
                .map(|r| r.counter_argument.clone())
                .collect(),
            evidence: brief
                .rebuttals
                .iter()
                .map(|r| r.justification.clone())
                .collect(),
            confidence: brief.confidence,
            mutation_types: Vec::new(),
        }
    }

    pub fn from_epistemology(analysis: &EpistemicAnalysis) -> Self {
        Self {
            agent_name: "Epistemologist".to_string(),
            arguments: vec![analysis.key_uncertainty.clone()],
            evidence: analysis.verifiable_facts.clone(),
            confidence: analysis.confidence(),
            mutation_types: Vec::new(),
        }
    }
}

/// Everything a completed tribunal produced for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateResult {
    pub case_id: usize,
    pub claim: String,
    pub truth: String,
    pub rounds: u32,
    pub prosecutor_response: AgentResponse,
    pub defense_response: AgentResponse,
    pub epistemologist_response: AgentResponse,
    pub final_verdict: Verdict,
    /// The foreman's summary.
    pub verdict_reasoning: String,
    pub confidence: f64,
    pub ruling: ForemanRuling,
    pub debate_transcript: Vec<CallRecord>,
}

impl DebateResult {
    /// Number of model calls made for this case.
    pub fn llm_calls(&self) -> usize {
        self.debate_transcript.len()
    }

    /// Mutation types the prosecution raised, skipping blank labels.
    pub fn alleged_mutations(&self) -> Vec<&MutationType> {
        self.prosecutor_response
            .mutation_types
            .iter()
            .filter(|m| !m.as_str().is_empty())
            .collect()
    }
}
