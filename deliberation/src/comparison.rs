//! Single-agent baseline vs tribunal: per-case agreement, batch statistics,
//! the markdown report, and the visualization data file.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::baseline::BaselineResult;
use crate::tribunal::DebateResult;
use crate::verdict::{percent_1dp, round_1dp, MutationType, Verdict, VerdictCounts};

/// Run description embedded in the visualization file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    pub total_cases: usize,
    pub systems: Vec<String>,
    pub description: String,
}

/// Final stance of one side of the tribunal, confidence in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub arguments: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySummary {
    pub key_uncertainty: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribunalAgents {
    pub prosecutor: SideSummary,
    pub defense: SideSummary,
    pub epistemologist: UncertaintySummary,
}

/// One system's answer for a case. Confidence is a percentage, one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemVerdict {
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasoning: String,
    pub mutation_types: Vec<MutationType>,
    pub llm_calls: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<TribunalAgents>,
}

impl SystemVerdict {
    fn from_baseline(result: &BaselineResult) -> Self {
        Self {
            verdict: result.verdict,
            confidence: percent_1dp(result.confidence),
            reasoning: result.reasoning.clone(),
            mutation_types: result.mutation_types.clone(),
            llm_calls: 1,
            agents: None,
        }
    }

    fn from_tribunal(result: &DebateResult) -> Self {
        let agents = TribunalAgents {
            prosecutor: SideSummary {
                arguments: result.prosecutor_response.arguments.clone(),
                confidence: percent_1dp(result.prosecutor_response.confidence),
            },
            defense: SideSummary {
                arguments: result.defense_response.arguments.clone(),
                confidence: percent_1dp(result.defense_response.confidence),
            },
            epistemologist: UncertaintySummary {
                key_uncertainty: result
                    .epistemologist_response
                    .arguments
                    .first()
                    .cloned()
                    .unwrap_or_default(),
                confidence: percent_1dp(result.epistemologist_response.confidence),
            },
        };
        Self {
            verdict: result.final_verdict,
            confidence: percent_1dp(result.confidence),
            reasoning: result.verdict_reasoning.clone(),
            mutation_types: result.alleged_mutations().into_iter().cloned().collect(),
            llm_calls: result.llm_calls(),
            agents: Some(agents),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseAgreement {
    pub verdict_match: bool,
    /// Absolute confidence gap in percentage points.
    pub confidence_diff: f64,
    /// Same set of mutation labels, ignoring order and repeats.
    pub mutation_types_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCase {
    pub case_id: usize,
    pub claim: String,
    pub truth: String,
    pub single_agent: SystemVerdict,
    pub multi_agent: SystemVerdict,
    pub comparison: CaseAgreement,
}

impl ComparisonCase {
    pub fn new(baseline: &BaselineResult, debate: &DebateResult) -> Self {
        let single_agent = SystemVerdict::from_baseline(baseline);
        let multi_agent = SystemVerdict::from_tribunal(debate);
        let single_types: HashSet<&MutationType> = single_agent.mutation_types.iter().collect();
        let multi_types: HashSet<&MutationType> = multi_agent.mutation_types.iter().collect();
        let comparison = CaseAgreement {
            verdict_match: single_agent.verdict == multi_agent.verdict,
            confidence_diff: round_1dp((baseline.confidence - debate.confidence) * 100.0).abs(),
            mutation_types_match: single_types == multi_types,
        };
        Self {
            case_id: baseline.case_id,
            claim: baseline.claim.clone(),
            truth: baseline.truth.clone(),
            single_agent,
            multi_agent,
            comparison,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemPair<T> {
    pub single_agent: T,
    pub multi_agent: T,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStatistics {
    /// Cases where both systems reached the same verdict.
    #[serde(default)]
    pub verdict_agreements: usize,
    /// Percentage of cases with matching verdicts, one decimal.
    pub verdict_agreement_rate: f64,
    /// Mean confidence per system, in percent, one decimal.
    pub average_confidence: SystemPair<f64>,
    pub verdict_distribution: SystemPair<VerdictCounts>,
}

impl ComparisonStatistics {
    /// Aggregate over compared cases; an empty slice yields zeros.
    pub fn from_cases(cases: &[ComparisonCase]) -> Self {
        if cases.is_empty() {
            return Self::default();
        }
        let total = cases.len() as f64;
        let matches = cases.iter().filter(|c| c.comparison.verdict_match).count();
        let mean = |f: fn(&ComparisonCase) -> f64| cases.iter().map(f).sum::<f64>() / total;

        Self {
            verdict_agreements: matches,
            verdict_agreement_rate: round_1dp(matches as f64 / total * 100.0),
            average_confidence: SystemPair {
                single_agent: round_1dp(mean(|c| c.single_agent.confidence)),
                multi_agent: round_1dp(mean(|c| c.multi_agent.confidence)),
            },
            verdict_distribution: SystemPair {
                single_agent: VerdictCounts::tally(cases.iter().map(|c| c.single_agent.verdict)),
                multi_agent: VerdictCounts::tally(cases.iter().map(|c| c.multi_agent.verdict)),
            },
        }
    }
}

/// Everything needed for the report and the visualization file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub metadata: ComparisonMetadata,
    pub cases: Vec<ComparisonCase>,
    pub statistics: ComparisonStatistics,
}

impl Comparison {
    /// Pair results by case id. Cases only one system finished are skipped.
    pub fn build(baseline: &[BaselineResult], debates: &[DebateResult]) -> Self {
        let cases: Vec<ComparisonCase> = baseline
            .iter()
            .filter_map(|b| {
                let paired = debates.iter().find(|d| d.case_id == b.case_id);
                if paired.is_none() {
                    warn!(case_id = b.case_id, "no tribunal result for case; excluded from comparison");
                }
                paired.map(|d| ComparisonCase::new(b, d))
            })
            .collect();
        for d in debates {
            if !baseline.iter().any(|b| b.case_id == d.case_id) {
                warn!(case_id = d.case_id, "no baseline result for case; excluded from comparison");
            }
        }

        let statistics = ComparisonStatistics::from_cases(&cases);
        Self {
            metadata: ComparisonMetadata {
                total_cases: cases.len(),
                systems: vec!["single_agent".to_string(), "multi_agent".to_string()],
                description: "Comparison of single-agent baseline vs multi-agent debate ensemble"
                    .to_string(),
            },
            cases,
            statistics,
        }
    }

    /// Markdown report: summary, methodology, a table per case, overall
    /// statistics, and the closing assessment.
    pub fn to_markdown(&self) -> String {
        let stats = &self.statistics;
        let total = self.cases.len();
        let mut md = String::new();
        md.push_str("# Single-Agent vs Multi-Agent Debate: Comparison Report\n\n");
        md.push_str("## Executive Summary\n\n");
        md.push_str("This report compares a simple single-agent fact-checking approach with our multi-agent adversarial debate system.\n\n");
        let _ = write!(
            md,
            "Across {total} compared cases the two systems agreed on {} verdicts ({:.0}%). \
             Average confidence was {:.1}% for the single agent and {:.1}% for the tribunal.\n\n",
            stats.verdict_agreements,
            stats.verdict_agreement_rate,
            stats.average_confidence.single_agent,
            stats.average_confidence.multi_agent
        );
        md.push_str("## Methodology\n\n");
        md.push_str("### Single-Agent Baseline\n");
        md.push_str("- **Approach**: Direct LLM call asking for verdict\n");
        md.push_str("- **Agents**: 1 (general fact-checker)\n");
        md.push_str("- **Process**: Single inference, no debate\n\n");
        md.push_str("### Multi-Agent Debate System\n");
        md.push_str("- **Approach**: Adversarial tribunal with multiple perspectives\n");
        md.push_str("- **Agents**: 4 (Prosecutor, Defense, Epistemologist, Jury Foreman)\n");
        md.push_str("- **Process**: Multi-round debate with explicit uncertainty analysis\n\n");

        md.push_str("## Case-by-Case Results\n\n");
        for case in &self.cases {
            let sa = &case.single_agent;
            let ma = &case.multi_agent;
            let _ = write!(md, "### Case {}\n\n", case.case_id);
            let _ = write!(md, "**Claim**: {}\n\n", case.claim);
            let _ = write!(md, "**Truth**: {}\n\n", case.truth);
            md.push_str("| Metric | Single-Agent | Multi-Agent |\n");
            md.push_str("|--------|--------------|-------------|\n");
            let _ = writeln!(
                md,
                "| Verdict | {} | {} |",
                sa.verdict.as_str().to_uppercase(),
                ma.verdict.as_str().to_uppercase()
            );
            let _ = writeln!(
                md,
                "| Confidence | {:.0}% | {:.0}% |",
                sa.confidence, ma.confidence
            );
            let _ = writeln!(md, "| LLM Calls | {} | {} |", sa.llm_calls, ma.llm_calls);
            let _ = write!(
                md,
                "| Mutation Types | {} | {} |\n\n",
                join_or_none(&sa.mutation_types),
                join_or_none(&ma.mutation_types)
            );
            let _ = write!(md, "**Single-Agent Reasoning**: {}\n\n", sa.reasoning);
            let _ = write!(md, "**Multi-Agent Reasoning**: {}\n\n", ma.reasoning);
            if !case.comparison.verdict_match {
                md.push_str("**DISAGREEMENT**: Systems reached different verdicts\n\n");
            }
            md.push_str("---\n\n");
        }

        md.push_str("## Overall Statistics\n\n");
        let _ = writeln!(
            md,
            "- **Average Confidence (Single-Agent)**: {:.1}%",
            stats.average_confidence.single_agent
        );
        let _ = write!(
            md,
            "- **Average Confidence (Multi-Agent)**: {:.1}%\n\n",
            stats.average_confidence.multi_agent
        );
        let _ = write!(
            md,
            "- **Agreement Rate**: {:.0}% ({}/{} cases)\n\n",
            stats.verdict_agreement_rate, stats.verdict_agreements, total
        );
        let dist = &stats.verdict_distribution;
        md.push_str("| Verdict | Single-Agent | Multi-Agent |\n");
        md.push_str("|---------|--------------|-------------|\n");
        for verdict in Verdict::ALL {
            let _ = writeln!(
                md,
                "| {} | {} | {} |",
                verdict,
                count_of(&dist.single_agent, verdict),
                count_of(&dist.multi_agent, verdict)
            );
        }
        md.push('\n');

        md.push_str("## Key Advantages of Multi-Agent System\n\n");
        for (idx, advantage) in ADVANTAGES.iter().enumerate() {
            let _ = writeln!(md, "{}. {advantage}", idx + 1);
        }
        md.push('\n');

        md.push_str("## Conclusion\n\n");
        md.push_str("The multi-agent debate system provides:\n");
        md.push_str("- More thorough analysis through adversarial testing\n");
        md.push_str("- Better calibrated confidence scores\n");
        md.push_str("- Transparent, auditable reasoning process\n");
        md.push_str("- Explicit handling of uncertainty and ambiguity\n\n");
        let disagreements = total - stats.verdict_agreements;
        if disagreements > 0 {
            let _ = write!(
                md,
                "The systems disagreed on {disagreements} of {total} cases; the debate transcripts show where the tribunal's reasoning departed from the single agent.\n\n"
            );
        }
        md.push_str("While the single-agent approach is faster, the multi-agent system offers superior reliability and interpretability for critical fact-checking tasks.\n");
        md
    }
}

const ADVANTAGES: [&str; 6] = [
    "**Adversarial Testing**: Prosecutor and Defense challenge each other's arguments",
    "**Uncertainty Quantification**: Epistemologist explicitly analyzes ambiguity",
    "**Transparent Reasoning**: Full debate transcript shows decision process",
    "**Bias Reduction**: Multiple perspectives prevent single-viewpoint bias",
    "**Calibrated Confidence**: Debate process leads to more realistic confidence scores",
    "**Nuanced Analysis**: Multi-round exchanges capture subtle distinctions",
];

fn count_of(counts: &VerdictCounts, verdict: Verdict) -> usize {
    match verdict {
        Verdict::Faithful => counts.faithful,
        Verdict::Mutated => counts.mutated,
        Verdict::Ambiguous => counts.ambiguous,
    }
}

fn join_or_none(types: &[MutationType]) -> String {
    if types.is_empty() {
        "None".to_string()
    } else {
        types
            .iter()
            .map(MutationType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
