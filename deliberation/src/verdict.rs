//! Verdict vocabulary shared by every jury protocol.

use serde::{Deserialize, Serialize};

/// Final classification of a claim against its source fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The claim accurately represents the source fact.
    Faithful,
    /// The claim distorts the source fact in a meaningful way.
    Mutated,
    /// Evidence is insufficient or genuinely open to interpretation.
    #[serde(alias = "uncertain")]
    Ambiguous,
}

impl Verdict {
    /// All verdicts in display order.
    pub const ALL: [Verdict; 3] = [Verdict::Faithful, Verdict::Mutated, Verdict::Ambiguous];

    /// Parse a model-supplied verdict.
    ///
    /// Case-insensitive; `uncertain` is accepted for `ambiguous` and anything
    /// unrecognised falls back to `Ambiguous`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "faithful" => Self::Faithful,
            "mutated" => Self::Mutated,
            _ => Self::Ambiguous,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Faithful => "faithful",
            Self::Mutated => "mutated",
            Self::Ambiguous => "ambiguous",
        }
    }

    /// Short status marker used in terminal output.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Faithful => "[OK]",
            Self::Mutated => "[X]",
            Self::Ambiguous => "[?]",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of distortion between a claim and its source fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MutationType {
    NumericalDistortion,
    MissingContext,
    CausalConfusion,
    Exaggeration,
    ScopeChange,
    TemporalMismatch,
    AddedInformation,
    NegationFraming,
    /// A label outside the known taxonomy, kept verbatim.
    Other(String),
}

impl MutationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NumericalDistortion => "numerical_distortion",
            Self::MissingContext => "missing_context",
            Self::CausalConfusion => "causal_confusion",
            Self::Exaggeration => "exaggeration",
            Self::ScopeChange => "scope_change",
            Self::TemporalMismatch => "temporal_mismatch",
            Self::AddedInformation => "added_information",
            Self::NegationFraming => "negation_framing",
            Self::Other(label) => label,
        }
    }

    /// Whether this label belongs to the known taxonomy.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for MutationType {
    fn from(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "numerical_distortion" => Self::NumericalDistortion,
            "missing_context" => Self::MissingContext,
            "causal_confusion" => Self::CausalConfusion,
            "exaggeration" => Self::Exaggeration,
            "scope_change" => Self::ScopeChange,
            "temporal_mismatch" => Self::TemporalMismatch,
            "added_information" => Self::AddedInformation,
            "negation_framing" => Self::NegationFraming,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl From<String> for MutationType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<MutationType> for String {
    fn from(value: MutationType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for MutationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to an accusation or argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Parse a model-supplied severity; unknown labels yield `None`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Tally of verdicts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    pub faithful: usize,
    pub mutated: usize,
    pub ambiguous: usize,
}

impl VerdictCounts {
    pub fn tally<I: IntoIterator<Item = Verdict>>(verdicts: I) -> Self {
        let mut counts = Self::default();
        for verdict in verdicts {
            counts.record(verdict);
        }
        counts
    }

    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Faithful => self.faithful += 1,
            Verdict::Mutated => self.mutated += 1,
            Verdict::Ambiguous => self.ambiguous += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.faithful + self.mutated + self.ambiguous
    }
}

/// Clamp a confidence into `[0, 1]`; NaN becomes 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Whole-percent rendering, e.g. `0.873` → `"87%"`.
pub fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Percentage with one decimal, as exported for visualization.
pub fn percent_1dp(confidence: f64) -> f64 {
    round_1dp(confidence * 100.0)
}

pub(crate) fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parse_lenient() {
        assert_eq!(Verdict::parse_lenient("FAITHFUL"), Verdict::Faithful);
        assert_eq!(Verdict::parse_lenient(" mutated "), Verdict::Mutated);
        assert_eq!(Verdict::parse_lenient("uncertain"), Verdict::Ambiguous);
        assert_eq!(Verdict::parse_lenient("guilty"), Verdict::Ambiguous);
        assert_eq!(Verdict::parse_lenient(""), Verdict::Ambiguous);
    }

    #[test]
    fn test_verdict_serde_accepts_uncertain_alias() {
        let parsed: Verdict = serde_json::from_str("\"uncertain\"").unwrap();
        assert_eq!(parsed, Verdict::Ambiguous);
        assert_eq!(
            serde_json::to_string(&Verdict::Ambiguous).unwrap(),
            "\"ambiguous\""
        );
    }

    #[test]
    fn test_mutation_type_known_and_other() {
        assert_eq!(
            MutationType::from("Numerical Distortion"),
            MutationType::NumericalDistortion
        );
        assert_eq!(
            MutationType::from("negation-framing"),
            MutationType::NegationFraming
        );
        let other = MutationType::from("Cherry Picking");
        assert_eq!(other, MutationType::Other("Cherry Picking".to_string()));
        assert!(!other.is_known());
        assert_eq!(other.to_string(), "Cherry Picking");
    }

    #[test]
    fn test_mutation_type_serializes_as_label() {
        let json = serde_json::to_string(&vec![
            MutationType::ScopeChange,
            MutationType::Other("x".into()),
        ])
        .unwrap();
        assert_eq!(json, "[\"scope_change\",\"x\"]");
        let back: Vec<MutationType> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], MutationType::ScopeChange);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse_lenient("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse_lenient("critical"), None);
    }

    #[test]
    fn test_verdict_counts() {
        let counts = VerdictCounts::tally([
            Verdict::Faithful,
            Verdict::Mutated,
            Verdict::Mutated,
            Verdict::Ambiguous,
        ]);
        assert_eq!(counts.faithful, 1);
        assert_eq!(counts.mutated, 2);
        assert_eq!(counts.ambiguous, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_confidence_helpers() {
        assert_eq!(clamp_confidence(1.7), 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
        assert_eq!(percent(0.873), "87%");
        assert_eq!(percent_1dp(0.8734), 87.3);
    }
}
