//! Claim/fact cases: loading, selection, and the strategic showcase set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::verdict::{MutationType, Verdict};

/// A single claim to be judged against its source fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Row position in the source dataset (0-based).
    pub id: usize,
    /// External claim under investigation.
    pub claim: String,
    /// Internal fact treated as ground truth.
    pub truth: String,
}

impl Case {
    pub fn new(id: usize, claim: impl Into<String>, truth: impl Into<String>) -> Self {
        Self {
            id,
            claim: claim.into(),
            truth: truth.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("failed to read case file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON case file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid case selection '{0}': expected comma-separated case numbers")]
    InvalidSelection(String),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    claim: String,
    #[serde(default)]
    truth: String,
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(default)]
    id: Option<usize>,
    #[serde(default)]
    claim: String,
    #[serde(default)]
    truth: String,
}

fn accept(id: usize, claim: &str, truth: &str) -> Option<Case> {
    let claim = claim.trim();
    let truth = truth.trim();
    if claim.is_empty() || truth.is_empty() {
        debug!(row = id, "skipping case with empty claim or truth");
        return None;
    }
    Some(Case::new(id, claim, truth))
}

fn truncate(mut cases: Vec<Case>, limit: Option<usize>) -> Vec<Case> {
    if let Some(limit) = limit {
        cases.truncate(limit);
    }
    cases
}

/// Parse cases from CSV text with `claim` and `truth` header columns.
///
/// The case id is the data-row index, so skipped rows still consume an id.
pub fn cases_from_csv<R: std::io::Read>(
    reader: R,
    limit: Option<usize>,
) -> Result<Vec<Case>, CaseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut cases = Vec::new();
    for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        if limit.is_some_and(|l| cases.len() >= l) {
            break;
        }
        let row = row?;
        if let Some(case) = accept(idx, &row.claim, &row.truth) {
            cases.push(case);
        }
    }
    Ok(cases)
}

/// Parse cases from a JSON array of `{claim, truth, id?}` objects.
pub fn cases_from_json(json: &str, limit: Option<usize>) -> Result<Vec<Case>, CaseError> {
    let rows: Vec<JsonRow> = serde_json::from_str(json)?;
    let cases = rows
        .into_iter()
        .enumerate()
        .filter_map(|(pos, row)| accept(row.id.unwrap_or(pos), &row.claim, &row.truth))
        .collect();
    Ok(truncate(cases, limit))
}

/// Load cases from disk; `.json` files are parsed as JSON, anything else as CSV.
pub fn load_cases(path: &Path, limit: Option<usize>) -> Result<Vec<Case>, CaseError> {
    let io_err = |source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    };
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let cases = if is_json {
        let content = std::fs::read_to_string(path).map_err(io_err)?;
        cases_from_json(&content, limit)?
    } else {
        let file = std::fs::File::open(path).map_err(io_err)?;
        cases_from_csv(file, limit)?
    };
    debug!(path = %path.display(), count = cases.len(), "loaded cases");
    Ok(cases)
}

/// Which cases a run should cover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaseSelection {
    /// The curated showcase set.
    #[default]
    Strategic,
    Single(usize),
    List(Vec<usize>),
    All,
}

impl CaseSelection {
    /// Parse a comma-separated list such as `"0,1, 5"`.
    pub fn parse_list(raw: &str) -> Result<Self, CaseError> {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| CaseError::InvalidSelection(raw.to_string()))?;
        if ids.is_empty() {
            return Err(CaseError::InvalidSelection(raw.to_string()));
        }
        Ok(Self::List(ids))
    }

    /// Requested ids, in order. `All` yields every loaded id.
    pub fn requested_ids(&self, cases: &[Case]) -> Vec<usize> {
        match self {
            Self::Strategic => STRATEGIC_CASES.iter().map(|s| s.id).collect(),
            Self::Single(id) => vec![*id],
            Self::List(ids) => ids.clone(),
            Self::All => cases.iter().map(|c| c.id).collect(),
        }
    }

    /// Resolve against loaded cases, keeping request order and dropping
    /// ids that do not exist.
    pub fn resolve<'a>(&self, cases: &'a [Case]) -> Vec<&'a Case> {
        self.requested_ids(cases)
            .into_iter()
            .filter_map(|id| {
                let found = cases.iter().find(|c| c.id == id);
                if found.is_none() {
                    warn!(case_id = id, "requested case not found in dataset; skipping");
                }
                found
            })
            .collect()
    }
}

/// A curated case chosen to showcase one class of mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategicCase {
    pub id: usize,
    pub description: &'static str,
    pub rationale: &'static str,
    pub expected: Verdict,
    mutation_label: Option<&'static str>,
}

impl StrategicCase {
    pub fn expected_mutation(&self) -> Option<MutationType> {
        self.mutation_label.map(MutationType::from)
    }

    /// Compare an actual verdict with the expectation for this case.
    pub fn check(&self, actual: Verdict) -> ExpectationCheck {
        ExpectationCheck {
            expected: self.expected,
            actual,
        }
    }
}

/// Showcase set spanning the mutation spectrum plus a faithful baseline.
pub const STRATEGIC_CASES: [StrategicCase; 5] = [
    StrategicCase {
        id: 0,
        description: "Numerical boundary: 'less than 14,550' vs 'more than 14,500'",
        rationale: "Subtle numerical boundary shift - tests precision detection",
        expected: Verdict::Mutated,
        mutation_label: Some("numerical_distortion"),
    },
    StrategicCase {
        id: 1,
        description: "Added information: '1,000 motorists' not in source",
        rationale: "Claim adds specific number not present in source",
        expected: Verdict::Mutated,
        mutation_label: Some("added_information"),
    },
    StrategicCase {
        id: 5,
        description: "Negation framing: 'failed to sell' vs neutral",
        rationale: "Negation framing of same underlying fact",
        expected: Verdict::Ambiguous,
        mutation_label: Some("negation_framing"),
    },
    StrategicCase {
        id: 6,
        description: "Faithful baseline: accurate extraction",
        rationale: "Accurate extraction from source - should be faithful",
        expected: Verdict::Faithful,
        mutation_label: None,
    },
    StrategicCase {
        id: 7,
        description: "Borderline: 359k vs 360k",
        rationale: "Borderline acceptable rounding - tests judgment",
        expected: Verdict::Ambiguous,
        mutation_label: Some("numerical_distortion"),
    },
];

/// Look up the strategic entry for a case id.
pub fn strategic_case(id: usize) -> Option<&'static StrategicCase> {
    STRATEGIC_CASES.iter().find(|s| s.id == id)
}

/// Expected-vs-actual comparison for a strategic case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationCheck {
    pub expected: Verdict,
    pub actual: Verdict,
}

impl ExpectationCheck {
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

impl std::fmt::Display for ExpectationCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected: {}, Got: {} {}",
            self.expected,
            self.actual,
            if self.matches() { "MATCH" } else { "DIFFERS" }
        )
    }
}
