//! Panel transcripts, the multi-case bundle, and the round summaries fed
//! back into later prompts.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stance::{ConsensusResult, CrossExamResponse, InitialStance, StanceUpdate};
use super::Panelist;
use crate::verdict::{percent, VerdictCounts};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRounds {
    pub round1_initial_stances: Vec<InitialStance>,
    pub round2_cross_examination: Vec<CrossExamResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub round2_stance_updates: Vec<StanceUpdate>,
    pub round3_consensus: ConsensusResult,
}

/// Full record of one panel debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelTranscript {
    pub case_id: usize,
    pub claim: String,
    pub truth: String,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub rounds: PanelRounds,
}

impl PanelTranscript {
    pub fn consensus(&self) -> &ConsensusResult {
        &self.rounds.round3_consensus
    }
}

/// Every panel debate of a run, with a verdict tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelBundle {
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub total_cases: usize,
    pub summary: VerdictCounts,
    pub debates: Vec<PanelTranscript>,
}

impl PanelBundle {
    /// Bundle transcripts; the model is taken from the first transcript, or
    /// `"unknown"` when there is none.
    pub fn new(debates: Vec<PanelTranscript>) -> Self {
        let model = debates
            .first()
            .map(|t| t.model.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            generated_at: Utc::now(),
            model,
            total_cases: debates.len(),
            summary: VerdictCounts::tally(debates.iter().map(|t| t.consensus().final_verdict)),
            debates,
        }
    }
}

/// A panelist's own round-1 position, as shown to it in round 2.
pub fn own_stance_text(stance: &InitialStance) -> String {
    let arguments =
        serde_json::to_string_pretty(&stance.arguments).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Verdict: {}\nConfidence: {}\nArguments: {}",
        stance.verdict, stance.confidence, arguments
    )
}

/// Arguments of every panelist except `agent`, with ids and evidence.
pub fn other_arguments_text(stances: &[InitialStance], agent: Panelist) -> String {
    let mut out = String::new();
    for other in stances.iter().filter(|s| s.agent != agent) {
        let _ = writeln!(out, "\n{} (verdict: {}):", other.agent, other.verdict);
        for arg in &other.arguments {
            let _ = writeln!(out, "  [{}] {}", arg.id, arg.text);
            if let Some(quote) = &arg.evidence_quote {
                let _ = writeln!(out, "      Evidence: \"{}\"", quote);
            }
        }
    }
    out
}

/// `AGENT: verdict (NN%)` followed by `[id] text` lines per stance.
pub fn round1_summary(stances: &[InitialStance]) -> String {
    let mut out = String::new();
    for stance in stances {
        let _ = writeln!(
            out,
            "\n{}: {} ({})",
            stance.agent,
            stance.verdict,
            percent(stance.confidence)
        );
        for arg in &stance.arguments {
            let _ = writeln!(out, "  [{}] {}", arg.id, arg.text);
        }
    }
    out
}

/// One `AGENT attacks TARGET's [id]: text` line per exchange.
pub fn round2_summary(exchanges: &[CrossExamResponse]) -> String {
    let mut out = String::new();
    for e in exchanges {
        let _ = writeln!(
            out,
            "\n{} {}s {}'s [{}]: {}",
            e.agent, e.action, e.target_agent, e.target_argument_id, e.response_text
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::stance::{Argument, ExamAction};
    use crate::verdict::Verdict;

    fn stance(agent: Panelist, verdict: Verdict, confidence: f64) -> InitialStance {
        InitialStance {
            agent,
            verdict,
            confidence,
            arguments: vec![Argument {
                id: format!("{}1", agent.id_prefix()),
                text: format!("{} argument", agent.name().to_lowercase()),
                evidence_quote: Some("quote".to_string()),
                severity: None,
            }],
            reasoning_summary: String::new(),
        }
    }

    fn consensus(verdict: Verdict) -> ConsensusResult {
        ConsensusResult {
            final_verdict: verdict,
            confidence: 0.7,
            majority_position: String::new(),
            key_agreements: vec![],
            unresolved_disputes: vec![],
            reasoning: String::new(),
        }
    }

    fn transcript(case_id: usize, model: &str, verdict: Verdict) -> PanelTranscript {
        PanelTranscript {
            case_id,
            claim: "c".to_string(),
            truth: "t".to_string(),
            timestamp: Utc::now(),
            model: model.to_string(),
            rounds: PanelRounds {
                round1_initial_stances: vec![],
                round2_cross_examination: vec![],
                round2_stance_updates: vec![],
                round3_consensus: consensus(verdict),
            },
        }
    }

    #[test]
    fn test_round1_summary_format() {
        let stances = vec![
            stance(Panelist::FactChecker, Verdict::Mutated, 0.85),
            stance(Panelist::Skeptic, Verdict::Faithful, 0.6),
        ];
        let summary = round1_summary(&stances);
        assert_eq!(
            summary,
            "\nFACT_CHECKER: mutated (85%)\n  [FC1] fact_checker argument\n\
             \nSKEPTIC: faithful (60%)\n  [SK1] skeptic argument\n"
        );
    }

    #[test]
    fn test_other_arguments_excludes_speaker() {
        let stances: Vec<InitialStance> = Panelist::ALL
            .iter()
            .map(|p| stance(*p, Verdict::Ambiguous, 0.5))
            .collect();
        let text = other_arguments_text(&stances, Panelist::Skeptic);
        assert!(text.contains("FACT_CHECKER (verdict: ambiguous):"));
        assert!(text.contains("  [CX1] contextualist argument"));
        assert!(text.contains("      Evidence: \"quote\""));
        assert!(!text.contains("SK1"));
    }

    #[test]
    fn test_round2_summary_format() {
        let exchanges = vec![CrossExamResponse {
            agent: Panelist::Contextualist,
            target_agent: "SKEPTIC".to_string(),
            target_argument_id: "SK1".to_string(),
            action: ExamAction::Concede,
            response_text: "Agreed.".to_string(),
            updated_confidence: 0.5,
        }];
        assert_eq!(
            round2_summary(&exchanges),
            "\nCONTEXTUALIST concedes SKEPTIC's [SK1]: Agreed.\n"
        );
    }

    #[test]
    fn test_own_stance_text() {
        let text = own_stance_text(&stance(Panelist::FactChecker, Verdict::Mutated, 0.8));
        assert!(text.starts_with("Verdict: mutated\nConfidence: 0.8\nArguments: ["));
        assert!(text.contains("\"id\": \"FC1\""));
    }

    #[test]
    fn test_transcript_json_shape() {
        let value = serde_json::to_value(transcript(3, "gpt-4o-mini", Verdict::Faithful)).unwrap();
        let rounds = value["rounds"].as_object().unwrap();
        assert!(rounds.contains_key("round1_initial_stances"));
        assert!(rounds.contains_key("round2_cross_examination"));
        assert!(!rounds.contains_key("round2_stance_updates"));
        assert_eq!(value["rounds"]["round3_consensus"]["final_verdict"], "faithful");
        assert_eq!(value["case_id"], 3);
    }

    #[test]
    fn test_bundle_summary_and_model() {
        let bundle = PanelBundle::new(vec![
            transcript(0, "gpt-4o", Verdict::Mutated),
            transcript(1, "gpt-4o", Verdict::Mutated),
            transcript(5, "gpt-4o", Verdict::Ambiguous),
        ]);
        assert_eq!(bundle.model, "gpt-4o");
        assert_eq!(bundle.total_cases, 3);
        assert_eq!(bundle.summary.mutated, 2);
        assert_eq!(bundle.summary.ambiguous, 1);

        let empty = PanelBundle::new(vec![]);
        assert_eq!(empty.model, "unknown");
        assert_eq!(empty.total_cases, 0);
    }
}
