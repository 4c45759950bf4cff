//! Plain-text reports for the terminal.
//!
//! Everything here returns a `String`; printing is left to the binary.

use std::fmt::Write as _;

use crate::case::{Case, STRATEGIC_CASES};
use crate::comparison::Comparison;
use crate::panel::{ConsensusResult, CrossExamResponse, InitialStance, PanelTranscript, StanceUpdate};
use crate::tribunal::{CallRecord, DebateResult};
use crate::verdict::{percent, Verdict, VerdictCounts};

const WIDTH: usize = 70;

/// Cut `text` to at most `max` characters, appending `...` only when cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn banner(title: &str, ch: char) -> String {
    let line = rule(ch);
    format!("{}\n{:^width$}\n{}", line, title, line, width = WIDTH)
}

fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(WIDTH).collect()
}

fn upper(verdict: Verdict) -> String {
    verdict.as_str().to_uppercase()
}

/// Full presentation of one tribunal case.
pub fn tribunal_report(result: &DebateResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", banner("FACT-VERIFICATION TRIBUNAL - CASE ANALYSIS", '='));
    let _ = writeln!(out, "\nCLAIM UNDER INVESTIGATION:\n   \"{}\"", result.claim);
    let _ = writeln!(out, "\nSOURCE FACT:\n   \"{}\"", result.truth);
    let _ = writeln!(out, "\n{}\nDEBATE TRANSCRIPT ({} rounds)\n{}", rule('-'), result.rounds, rule('-'));

    let sides = [
        ("PROSECUTOR (Mutation Hunter)", &result.prosecutor_response),
        ("DEFENSE (Faithful Interpreter)", &result.defense_response),
    ];
    for (title, response) in sides {
        let _ = writeln!(out, "\n{title}:");
        for (i, arg) in response.arguments.iter().take(3).enumerate() {
            let _ = writeln!(out, "   {}. {}", i + 1, truncate(arg, 150));
        }
        let _ = writeln!(out, "   Confidence: {}", percent(response.confidence));
    }

    let uncertainty = result
        .epistemologist_response
        .arguments
        .first()
        .map(String::as_str)
        .unwrap_or("");
    let _ = writeln!(out, "\nEPISTEMOLOGIST (Uncertainty Quantifier):");
    let _ = writeln!(out, "   Key uncertainty: {}", truncate(uncertainty, 200));

    let _ = writeln!(out, "\n{}\nVERDICT\n{}", rule('-'), rule('-'));
    let _ = writeln!(
        out,
        "\n{} FINAL VERDICT: {}",
        result.final_verdict.marker(),
        upper(result.final_verdict)
    );
    let _ = writeln!(out, "   Confidence: {}", percent(result.confidence));
    let _ = writeln!(out, "\n   Reasoning: {}", result.verdict_reasoning);

    let mutations = result.alleged_mutations();
    if !mutations.is_empty() {
        let labels: Vec<&str> = mutations.iter().map(|m| m.as_str()).collect();
        let _ = writeln!(out, "\n   Mutation types identified: {}", labels.join(", "));
    }
    let _ = write!(out, "\n{}", rule('='));
    out
}

fn average_confidence(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn counts_block(out: &mut String, counts: &VerdictCounts) {
    let _ = writeln!(out, "  {} Faithful: {}", Verdict::Faithful.marker(), counts.faithful);
    let _ = writeln!(out, "  {} Mutated: {}", Verdict::Mutated.marker(), counts.mutated);
    let _ = writeln!(out, "  {} Ambiguous: {}", Verdict::Ambiguous.marker(), counts.ambiguous);
}

/// Batch summary over tribunal results.
pub fn tribunal_summary(results: &[DebateResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", banner("TRIBUNAL SUMMARY", '='));
    let counts = VerdictCounts::tally(results.iter().map(|r| r.final_verdict));
    let _ = writeln!(out, "\nTotal cases analyzed: {}", results.len());
    counts_block(&mut out, &counts);
    let _ = writeln!(
        out,
        "  Average confidence: {}",
        percent(average_confidence(results.iter().map(|r| r.confidence)))
    );
    for r in results {
        let _ = writeln!(
            out,
            "\n{} Case {}: {} ({})",
            r.final_verdict.marker(),
            r.case_id,
            upper(r.final_verdict),
            percent(r.confidence)
        );
        let _ = writeln!(out, "   Claim: {}", truncate(&r.claim, 60));
        let _ = writeln!(out, "   Reason: {}", truncate(&r.verdict_reasoning, 100));
    }
    out
}

/// One panelist's round-1 stance.
pub fn stance_block(stance: &InitialStance) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[{}]", stance.agent);
    let _ = writeln!(
        out,
        "  Verdict: {} (confidence: {})",
        upper(stance.verdict),
        percent(stance.confidence)
    );
    let _ = writeln!(out, "  {}", stance.reasoning_summary);
    let _ = writeln!(out, "  Arguments:");
    for arg in &stance.arguments {
        let _ = writeln!(out, "    - [{}] {}", arg.id, arg.text);
        if let Some(quote) = &arg.evidence_quote {
            let _ = writeln!(out, "      Evidence: \"{}\"", truncate(quote, 80));
        }
        if let Some(severity) = arg.severity {
            let _ = writeln!(out, "      [{}]", severity.to_string().to_uppercase());
        }
    }
    out
}

/// One cross-examination response.
pub fn exchange_line(exchange: &CrossExamResponse) -> String {
    format!(
        "  {} -> {}'s [{}]:\n    {}: {}",
        exchange.agent,
        exchange.target_agent,
        exchange.target_argument_id,
        exchange.action.as_str().to_uppercase(),
        exchange.response_text
    )
}

pub fn stance_update_line(update: &StanceUpdate) -> String {
    let mut line = String::new();
    if let (true, Some(verdict)) = (update.stance_changed, update.new_verdict) {
        let _ = writeln!(line, "  Stance changed to: {}", verdict);
    }
    let _ = write!(line, "  Updated confidence: {}", percent(update.updated_confidence));
    line
}

/// The moderator's synthesis.
pub fn consensus_block(consensus: &ConsensusResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n  {} FINAL VERDICT: {}",
        consensus.final_verdict.marker(),
        upper(consensus.final_verdict)
    );
    let _ = writeln!(out, "  Confidence: {}", percent(consensus.confidence));
    let _ = writeln!(out, "\n  Majority position: {}", consensus.majority_position);
    if !consensus.key_agreements.is_empty() {
        let _ = writeln!(out, "\n  Key Agreements:");
        for agreement in &consensus.key_agreements {
            let _ = writeln!(out, "    + {agreement}");
        }
    }
    if !consensus.unresolved_disputes.is_empty() {
        let _ = writeln!(out, "\n  Unresolved Disputes:");
        for dispute in &consensus.unresolved_disputes {
            let _ = writeln!(out, "    ? {dispute}");
        }
    }
    let _ = write!(out, "\n  Reasoning:\n  {}", consensus.reasoning);
    out
}

/// One line per panel debate plus a tally.
pub fn panel_summary(transcripts: &[PanelTranscript]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", banner("SUMMARY", '='));
    for t in transcripts {
        let consensus = t.consensus();
        let _ = writeln!(
            out,
            "\nCase {}: {} {} ({})",
            t.case_id,
            consensus.final_verdict.marker(),
            upper(consensus.final_verdict),
            percent(consensus.confidence)
        );
        let _ = writeln!(out, "  {}", truncate(&t.claim, 60));
    }
    let counts = VerdictCounts::tally(transcripts.iter().map(|t| t.consensus().final_verdict));
    let _ = writeln!(out);
    counts_block(&mut out, &counts);
    out
}

/// Loaded cases with claim and truth shortened.
pub fn case_list(cases: &[Case]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", banner("AVAILABLE CASES", '='));
    for case in cases {
        let _ = writeln!(out, "\n[Case {}]", case.id);
        let _ = writeln!(out, "  CLAIM: {}", truncate(&case.claim, 80));
        let _ = writeln!(out, "  TRUTH: {}", truncate(&case.truth, 80));
    }
    let _ = write!(out, "\n{}", rule('='));
    out
}

/// The curated showcase cases with their rationale.
pub fn strategic_overview() -> String {
    let mut out = String::from("Using strategic case selection:\n");
    for s in &STRATEGIC_CASES {
        let _ = writeln!(out, "  Case {}: {}", s.id, s.description);
        let _ = writeln!(
            out,
            "          {} (expected: {})",
            s.rationale, s.expected
        );
    }
    out
}

/// One raw model reply, pretty-printed when it is JSON.
pub fn raw_call_block(case_id: usize, call: &CallRecord) -> String {
    let title = format!(
        "CASE {} - {} - COMPLETE RAW LLM RESPONSE",
        case_id,
        call.agent.to_uppercase()
    );
    format!(
        "\n{}\n{}\n{}\n{}\n{}\n",
        rule('='),
        title,
        rule('='),
        call.pretty_response(),
        rule('=')
    )
}

/// Side-by-side console view of a comparison.
pub fn comparison_details(comparison: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", banner("DETAILED COMPARISON", '='));
    for case in &comparison.cases {
        let sa = &case.single_agent;
        let ma = &case.multi_agent;
        let _ = writeln!(out, "\n{}", rule('-'));
        let _ = writeln!(out, "CASE {}: {}", case.case_id, truncate(&case.claim, 60));
        let _ = writeln!(out, "{}", rule('-'));
        let _ = writeln!(out, "\nVERDICTS:");
        let _ = writeln!(out, "  Single-Agent: {} ({:.0}% confidence)", upper(sa.verdict), sa.confidence);
        let _ = writeln!(out, "  Multi-Agent:  {} ({:.0}% confidence)", upper(ma.verdict), ma.confidence);
        let _ = writeln!(
            out,
            "  {}",
            if case.comparison.verdict_match { "Agreement" } else { "DISAGREEMENT!" }
        );
        let _ = writeln!(out, "\nREASONING:");
        let _ = writeln!(out, "  Single-Agent: {}", truncate(&sa.reasoning, 150));
        let _ = writeln!(out, "  Multi-Agent:  {}", truncate(&ma.reasoning, 150));
        let _ = writeln!(out, "\nCONFIDENCE DIFFERENCE: {:.1}%", case.comparison.confidence_diff);
    }
    let stats = &comparison.statistics;
    let _ = writeln!(out, "\n{}", banner("OVERALL STATISTICS", '='));
    let _ = writeln!(out, "\nAverage Confidence:");
    let _ = writeln!(out, "  Single-Agent: {:.1}%", stats.average_confidence.single_agent);
    let _ = writeln!(out, "  Multi-Agent:  {:.1}%", stats.average_confidence.multi_agent);
    let _ = writeln!(
        out,
        "\nAgreement Rate: {:.0}% ({}/{} cases)",
        stats.verdict_agreement_rate,
        stats.verdict_agreements,
        comparison.cases.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Argument, ExamAction, Panelist};
    use crate::tribunal::{AgentResponse, ForemanRuling};
    use crate::verdict::{MutationType, Severity};

    fn result() -> DebateResult {
        let long = "x".repeat(400);
        DebateResult {
            case_id: 0,
            claim: "Less than 14,550 people have died in the outbreak so far, officials said today".to_string(),
            truth: "more than 14,500 deaths".to_string(),
            rounds: 3,
            prosecutor_response: AgentResponse {
                agent_name: "Prosecutor".to_string(),
                arguments: vec![long.clone(), "b".into(), "c".into(), "d".into()],
                evidence: vec![],
                confidence: 0.9,
                mutation_types: vec![MutationType::NumericalDistortion, MutationType::Other(String::new())],
            },
            defense_response: AgentResponse {
                agent_name: "Defense".to_string(),
                arguments: vec!["short".into()],
                evidence: vec![],
                confidence: 0.3,
                mutation_types: vec![],
            },
            epistemologist_response: AgentResponse {
                agent_name: "Epistemologist".to_string(),
                arguments: vec![long],
                evidence: vec![],
                confidence: 0.6,
                mutation_types: vec![],
            },
            final_verdict: Verdict::Mutated,
            verdict_reasoning: "Boundary reversed.".to_string(),
            confidence: 0.85,
            ruling: ForemanRuling::default(),
            debate_transcript: vec![],
        }
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("héllo wörld", 4), "héll...");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_tribunal_report() {
        let report = tribunal_report(&result());
        assert!(report.contains("DEBATE TRANSCRIPT (3 rounds)"));
        assert!(report.contains(&format!("   1. {}...", "x".repeat(150))));
        assert!(report.contains("   3. c\n"));
        assert!(!report.contains("   4. d"));
        assert!(report.contains(&format!("Key uncertainty: {}...", "x".repeat(200))));
        assert!(report.contains("[X] FINAL VERDICT: MUTATED"));
        assert!(report.contains("Confidence: 85%"));
        assert!(report.contains("Mutation types identified: numerical_distortion\n"));
    }

    #[test]
    fn test_tribunal_summary() {
        let summary = tribunal_summary(&[result()]);
        assert!(summary.contains("Total cases analyzed: 1"));
        assert!(summary.contains("[X] Mutated: 1"));
        assert!(summary.contains("Average confidence: 85%"));
        assert!(summary.contains(&format!("Claim: {}...", &result().claim[..60])));

        let empty = tribunal_summary(&[]);
        assert!(empty.contains("Average confidence: 0%"));
    }

    #[test]
    fn test_panel_blocks() {
        let stance = InitialStance {
            agent: Panelist::FactChecker,
            verdict: Verdict::Mutated,
            confidence: 0.9,
            arguments: vec![Argument {
                id: "FC1".to_string(),
                text: "Direction flipped".to_string(),
                evidence_quote: Some("less than".to_string()),
                severity: Some(Severity::High),
            }],
            reasoning_summary: "Reversed.".to_string(),
        };
        let block = stance_block(&stance);
        assert!(block.contains("[FACT_CHECKER]"));
        assert!(block.contains("Verdict: MUTATED (confidence: 90%)"));
        assert!(block.contains("[HIGH]"));

        let exchange = CrossExamResponse {
            agent: Panelist::Skeptic,
            target_agent: "FACT_CHECKER".to_string(),
            target_argument_id: "FC1".to_string(),
            action: ExamAction::Attack,
            response_text: "Overreach.".to_string(),
            updated_confidence: 0.5,
        };
        assert_eq!(
            exchange_line(&exchange),
            "  SKEPTIC -> FACT_CHECKER's [FC1]:\n    ATTACK: Overreach."
        );

        let update = StanceUpdate {
            agent: Panelist::Skeptic,
            updated_confidence: 0.4,
            stance_changed: true,
            new_verdict: Some(Verdict::Mutated),
        };
        assert_eq!(
            stance_update_line(&update),
            "  Stance changed to: mutated\n  Updated confidence: 40%"
        );
    }

    #[test]
    fn test_consensus_block_omits_empty_lists() {
        let consensus = ConsensusResult {
            final_verdict: Verdict::Faithful,
            confidence: 0.7,
            majority_position: "Accurate".to_string(),
            key_agreements: vec!["dates match".to_string()],
            unresolved_disputes: vec![],
            reasoning: "All agree.".to_string(),
        };
        let block = consensus_block(&consensus);
        assert!(block.contains("[OK] FINAL VERDICT: FAITHFUL"));
        assert!(block.contains("+ dates match"));
        assert!(!block.contains("Unresolved"));
    }

    #[test]
    fn test_case_list_and_raw_call() {
        let cases = vec![Case::new(4, "a".repeat(100), "short truth")];
        let list = case_list(&cases);
        assert!(list.contains("[Case 4]"));
        assert!(list.contains(&format!("CLAIM: {}...", "a".repeat(80))));
        assert!(list.contains("TRUTH: short truth\n"));

        let block = raw_call_block(4, &CallRecord::new("Jury Foreman", "plain text"));
        assert!(block.contains("CASE 4 - JURY FOREMAN - COMPLETE RAW LLM RESPONSE"));
        assert!(block.contains("\nplain text\n"));
    }

    #[test]
    fn test_strategic_overview_lists_all() {
        let overview = strategic_overview();
        for s in &STRATEGIC_CASES {
            assert!(overview.contains(&format!("Case {}:", s.id)));
        }
    }
}
