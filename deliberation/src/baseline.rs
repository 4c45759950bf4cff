//! Single-agent baseline record: one call, one verdict.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::case::Case;
use crate::lenient;
use crate::verdict::{MutationType, Verdict};

/// Fields a baseline reply is expected to carry.
#[derive(Debug, Clone, Deserialize)]
struct BaselineReply {
    #[serde(default = "ambiguous", deserialize_with = "lenient::verdict")]
    verdict: Verdict,
    #[serde(default, deserialize_with = "lenient::confidence")]
    confidence: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    reasoning: String,
    #[serde(default, deserialize_with = "lenient::mutation_types")]
    mutation_types: Vec<MutationType>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    key_evidence: Vec<String>,
}

impl Default for BaselineReply {
    fn default() -> Self {
        Self {
            verdict: Verdict::Ambiguous,
            confidence: 0.0,
            reasoning: String::new(),
            mutation_types: Vec::new(),
            key_evidence: Vec::new(),
        }
    }
}

fn ambiguous() -> Verdict {
    Verdict::Ambiguous
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineResult {
    pub case_id: usize,
    pub claim: String,
    pub truth: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasoning: String,
    pub mutation_types: Vec<MutationType>,
    pub key_evidence: Vec<String>,
    /// The reply object exactly as parsed.
    pub raw_response: Value,
}

impl BaselineResult {
    /// Build from a parsed reply object. Fields that do not fit the expected
    /// shape fall back to their defaults.
    pub fn from_reply(case: &Case, reply: Value) -> Self {
        let parsed = Some(&reply)
            .filter(|r| r.is_object())
            .and_then(|r| serde_json::from_value::<BaselineReply>(r.clone()).ok())
            .unwrap_or_default();
        Self {
            case_id: case.id,
            claim: case.claim.clone(),
            truth: case.truth.clone(),
            verdict: parsed.verdict,
            confidence: parsed.confidence,
            reasoning: parsed.reasoning,
            mutation_types: parsed.mutation_types,
            key_evidence: parsed.key_evidence,
            raw_response: reply,
        }
    }
}
