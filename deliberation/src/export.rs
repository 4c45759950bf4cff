//! JSON output files and reloading them for inspection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::baseline::BaselineResult;
use crate::tribunal::{AgentResponse, CallRecord, DebateResult, ForemanRuling};
use crate::verdict::Verdict;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{path} is not a valid results file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribunalAgentsExport {
    pub prosecutor: AgentResponse,
    pub defense: AgentResponse,
    pub epistemologist: AgentResponse,
}

/// One entry of `debate_results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateExport {
    pub case_id: usize,
    pub claim: String,
    pub truth: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasoning: String,
    pub rounds: u32,
    pub agents: TribunalAgentsExport,
    pub ruling: ForemanRuling,
    pub debate_transcript: Vec<CallRecord>,
}

impl From<&DebateResult> for DebateExport {
    fn from(result: &DebateResult) -> Self {
        Self {
            case_id: result.case_id,
            claim: result.claim.clone(),
            truth: result.truth.clone(),
            verdict: result.final_verdict,
            confidence: result.confidence,
            reasoning: result.verdict_reasoning.clone(),
            rounds: result.rounds,
            agents: TribunalAgentsExport {
                prosecutor: result.prosecutor_response.clone(),
                defense: result.defense_response.clone(),
                epistemologist: result.epistemologist_response.clone(),
            },
            ruling: result.ruling.clone(),
            debate_transcript: result.debate_transcript.clone(),
        }
    }
}

/// Write `value` as pretty-printed JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

/// Write UTF-8 text, creating parent directories.
pub fn write_text(path: &Path, content: &str) -> Result<(), ExportError> {
    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)?;
    info!(path = %path.display(), bytes = content.len(), "wrote output file");
    Ok(())
}

pub fn export_debates(path: &Path, results: &[DebateResult]) -> Result<(), ExportError> {
    let records: Vec<DebateExport> = results.iter().map(DebateExport::from).collect();
    write_json_pretty(path, &records)
}

pub fn export_baseline(path: &Path, results: &[BaselineResult]) -> Result<(), ExportError> {
    write_json_pretty(path, results)
}

/// Reload a `debate_results.json` file.
pub fn load_debate_exports(path: &Path) -> Result<Vec<DebateExport>, ExportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Case;
    use serde_json::json;

    fn debate(case_id: usize) -> DebateResult {
        let agent = |name: &str, confidence: f64| AgentResponse {
            agent_name: name.to_string(),
            arguments: vec![format!("{name} says")],
            evidence: vec![],
            confidence,
            mutation_types: vec![],
        };
        DebateResult {
            case_id,
            claim: "claim".to_string(),
            truth: "truth".to_string(),
            rounds: 2,
            prosecutor_response: agent("Prosecutor", 0.8),
            defense_response: agent("Defense", 0.4),
            epistemologist_response: agent("Epistemologist", 0.6),
            final_verdict: Verdict::Mutated,
            verdict_reasoning: "summary".to_string(),
            confidence: 0.75,
            ruling: ForemanRuling::default(),
            debate_transcript: vec![CallRecord::new("Prosecutor", r#"{"accusations":[]}"#)],
        }
    }

    #[test]
    fn test_export_and_reload_debates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/debate_results.json");
        export_debates(&path, &[debate(0), debate(5)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {\n    \"case_id\": 0,"));

        let records = load_debate_exports(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].case_id, 5);
        assert_eq!(records[0].verdict, Verdict::Mutated);
        assert_eq!(records[0].reasoning, "summary");
        assert_eq!(records[0].agents.defense.confidence, 0.4);
        assert_eq!(records[0].debate_transcript[0].agent, "Prosecutor");
    }

    #[test]
    fn test_export_baseline_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single_agent_results.json");
        let result = BaselineResult::from_reply(
            &Case::new(2, "c", "t"),
            json!({"verdict": "faithful", "confidence": 0.9, "key_evidence": ["e"]}),
        );
        export_baseline(&path, &[result]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["case_id"], 2);
        assert_eq!(value[0]["verdict"], "faithful");
        assert_eq!(value[0]["key_evidence"], json!(["e"]));
        assert_eq!(value[0]["raw_response"]["confidence"], json!(0.9));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_debate_exports(&missing),
            Err(ExportError::Read { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(
            load_debate_exports(&bad),
            Err(ExportError::Parse { .. })
        ));
    }
}
