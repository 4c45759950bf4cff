//! Structured briefs returned by each tribunal role.
//!
//! Every field defaults when the model omits it, so a sparse reply still
//! yields a usable brief.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::verdict::{MutationType, Severity, Verdict};

/// One alleged distortion raised by the prosecution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accusation {
    /// Mutation label as written by the model.
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub evidence: String,
    #[serde(default, deserialize_with = "lenient::severity")]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub explanation: String,
}

impl Accusation {
    pub fn mutation_type(&self) -> MutationType {
        MutationType::from(self.kind.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProsecutionBrief {
    #[serde(default, deserialize_with = "accusations")]
    pub accusations: Vec<Accusation>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub overall_assessment: String,
    #[serde(default, deserialize_with = "lenient::confidence")]
    pub confidence: f64,
}

/// A defense answer to one accusation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rebuttal {
    #[serde(default, deserialize_with = "lenient::text")]
    pub accusation_addressed: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub counter_argument: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefenseBrief {
    #[serde(default, deserialize_with = "rebuttals")]
    pub rebuttals: Vec<Rebuttal>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub faithful_elements: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub overall_assessment: String,
    #[serde(default, deserialize_with = "lenient::confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmbiguityAnalysis {
    #[serde(default, deserialize_with = "lenient::text")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub impact: String,
}

/// Strong and weak points of one side, as judged by the epistemologist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentValidity {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub strong_points: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub weak_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpistemicAnalysis {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub verifiable_facts: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub interpretation_dependent: Vec<String>,
    #[serde(default, deserialize_with = "object_or_default")]
    pub ambiguity_analysis: AmbiguityAnalysis,
    #[serde(default, deserialize_with = "object_or_default")]
    pub prosecution_validity: ArgumentValidity,
    #[serde(default, deserialize_with = "object_or_default")]
    pub defense_validity: ArgumentValidity,
    #[serde(
        default = "default_confidence_range",
        deserialize_with = "confidence_range"
    )]
    pub recommended_confidence_range: [f64; 2],
    #[serde(default, deserialize_with = "lenient::optional_verdict")]
    pub verdict_recommendation: Option<Verdict>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub key_uncertainty: String,
}

impl Default for EpistemicAnalysis {
    fn default() -> Self {
        Self {
            verifiable_facts: Vec::new(),
            interpretation_dependent: Vec::new(),
            ambiguity_analysis: AmbiguityAnalysis::default(),
            prosecution_validity: ArgumentValidity::default(),
            defense_validity: ArgumentValidity::default(),
            recommended_confidence_range: default_confidence_range(),
            verdict_recommendation: None,
            key_uncertainty: String::new(),
        }
    }
}

impl EpistemicAnalysis {
    /// Upper bound of the recommended range.
    pub fn confidence(&self) -> f64 {
        self.recommended_confidence_range[1]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulingReasoning {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub decisive_factors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub prosecution_points_accepted: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub prosecution_points_rejected: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub defense_points_accepted: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub uncertainty_acknowledgment: String,
}

/// The Jury Foreman's final ruling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForemanRuling {
    #[serde(default = "ambiguous", deserialize_with = "lenient::verdict")]
    pub verdict: Verdict,
    #[serde(default, deserialize_with = "lenient::confidence")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "object_or_default")]
    pub reasoning: RulingReasoning,
    #[serde(default, deserialize_with = "lenient::mutation_types")]
    pub mutation_types_identified: Vec<MutationType>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
}

impl Default for ForemanRuling {
    fn default() -> Self {
        Self {
            verdict: Verdict::Ambiguous,
            confidence: 0.0,
            reasoning: RulingReasoning::default(),
            mutation_types_identified: Vec::new(),
            summary: String::new(),
        }
    }
}

fn ambiguous() -> Verdict {
    Verdict::Ambiguous
}

fn default_confidence_range() -> [f64; 2] {
    [0.5, 0.5]
}

fn confidence_range<'de, D>(deserializer: D) -> Result<[f64; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) if items.len() >= 2 => [
            lenient::value_to_confidence(&items[0]),
            lenient::value_to_confidence(&items[1]),
        ],
        Value::Array(items) if items.len() == 1 => {
            let only = lenient::value_to_confidence(&items[0]);
            [only, only]
        }
        Value::Number(_) | Value::String(_) => {
            let only = lenient::value_to_confidence(&value);
            [only, only]
        }
        _ => default_confidence_range(),
    })
}

/// Nested objects fall back to their default when the model sends
/// something other than an object.
fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(T::default()),
    }
}

fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => return Ok(Vec::new()),
    };
    items
        .into_iter()
        .filter(Value::is_object)
        .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
        .collect()
}

fn accusations<'de, D>(deserializer: D) -> Result<Vec<Accusation>, D::Error>
where
    D: Deserializer<'de>,
{
    object_list(deserializer)
}

fn rebuttals<'de, D>(deserializer: D) -> Result<Vec<Rebuttal>, D::Error>
where
    D: Deserializer<'de>,
{
    object_list(deserializer)
}
