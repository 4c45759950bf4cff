//! Panel round records and the model replies they are built from.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Panelist;
use crate::lenient;
use crate::verdict::{Severity, Verdict};

/// One numbered argument in an initial stance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub evidence_quote: Option<String>,
    #[serde(default, deserialize_with = "lenient::severity")]
    pub severity: Option<Severity>,
}

/// Round 1 reply as sent by a panelist.
#[derive(Debug, Clone, Deserialize)]
pub struct StanceReply {
    #[serde(default = "ambiguous", deserialize_with = "lenient::verdict")]
    pub verdict: Verdict,
    #[serde(default, deserialize_with = "lenient::confidence")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "arguments")]
    pub arguments: Vec<Argument>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reasoning_summary: String,
}

impl StanceReply {
    /// Attach the speaker and fill in missing argument ids (`FC1`, `FC2`, ...).
    pub fn into_stance(self, agent: Panelist) -> InitialStance {
        let arguments = self
            .arguments
            .into_iter()
            .enumerate()
            .map(|(idx, mut arg)| {
                if arg.id.trim().is_empty() {
                    arg.id = format!("{}{}", agent.id_prefix(), idx + 1);
                }
                arg
            })
            .collect();
        InitialStance {
            agent,
            verdict: self.verdict,
            confidence: self.confidence,
            arguments,
            reasoning_summary: self.reasoning_summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialStance {
    pub agent: Panelist,
    pub verdict: Verdict,
    pub confidence: f64,
    pub arguments: Vec<Argument>,
    pub reasoning_summary: String,
}

/// Whether a cross-examination response attacks or accepts an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamAction {
    Attack,
    Concede,
}

impl ExamAction {
    /// Anything other than a concession is treated as an attack.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "concede" | "concedes" | "conceded" => Self::Concede,
            _ => Self::Attack,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Concede => "concede",
        }
    }
}

impl std::fmt::Display for ExamAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrossExamItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub target_agent: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub target_argument_id: String,
    #[serde(default = "attack", deserialize_with = "exam_action")]
    pub action: ExamAction,
    #[serde(default, deserialize_with = "lenient::text")]
    pub response_text: String,
}

/// Round 2 reply as sent by a panelist.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossExamReply {
    #[serde(default, deserialize_with = "cross_exam_items")]
    pub responses: Vec<CrossExamItem>,
    #[serde(default, deserialize_with = "lenient::confidence")]
    pub updated_confidence: f64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub stance_changed: bool,
    #[serde(default, deserialize_with = "lenient::optional_verdict")]
    pub new_verdict: Option<Verdict>,
}

impl CrossExamReply {
    /// Split into one exchange per response item plus the speaker's stance update.
    pub fn into_exchanges(self, agent: Panelist) -> (Vec<CrossExamResponse>, StanceUpdate) {
        let updated_confidence = self.updated_confidence;
        let exchanges = self
            .responses
            .into_iter()
            .map(|item| CrossExamResponse {
                agent,
                target_agent: item.target_agent,
                target_argument_id: item.target_argument_id,
                action: item.action,
                response_text: item.response_text,
                updated_confidence,
            })
            .collect();
        let update = StanceUpdate {
            agent,
            updated_confidence,
            stance_changed: self.stance_changed,
            new_verdict: if self.stance_changed {
                self.new_verdict
            } else {
                None
            },
        };
        (exchanges, update)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossExamResponse {
    pub agent: Panelist,
    pub target_agent: String,
    pub target_argument_id: String,
    pub action: ExamAction,
    pub response_text: String,
    pub updated_confidence: f64,
}

/// A panelist's position after cross-examination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StanceUpdate {
    pub agent: Panelist,
    pub updated_confidence: f64,
    pub stance_changed: bool,
    pub new_verdict: Option<Verdict>,
}

/// Round 3 moderator synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    #[serde(default = "ambiguous", deserialize_with = "lenient::verdict")]
    pub final_verdict: Verdict,
    #[serde(default, deserialize_with = "lenient::confidence")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub majority_position: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub key_agreements: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub unresolved_disputes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reasoning: String,
}

fn ambiguous() -> Verdict {
    Verdict::Ambiguous
}

fn attack() -> ExamAction {
    ExamAction::Attack
}

fn exam_action<'de, D>(deserializer: D) -> Result<ExamAction, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(ExamAction::parse_lenient(&lenient::value_to_text(&value)))
}

fn objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn arguments<'de, D>(deserializer: D) -> Result<Vec<Argument>, D::Error>
where
    D: Deserializer<'de>,
{
    objects(deserializer)
}

fn cross_exam_items<'de, D>(deserializer: D) -> Result<Vec<CrossExamItem>, D::Error>
where
    D: Deserializer<'de>,
{
    objects(deserializer)
}
