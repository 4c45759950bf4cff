//! System prompts and user-prompt builders for every role.
//!
//! Tribunal roles see earlier briefs re-serialized as pretty JSON; panel
//! rounds see the plain-text summaries built in `deliberation::panel`.

use deliberation::panel::Panelist;
use deliberation::tribunal::{DefenseBrief, EpistemicAnalysis, ProsecutionBrief};
use deliberation::Case;
use serde::Serialize;

// ── Tribunal ─────────────────────────────────────────────────────────────────

pub const PROSECUTOR_SYSTEM: &str = r#"You are the PROSECUTOR in a fact-verification tribunal. Your role is to find ANY evidence that the external claim MUTATES or DISTORTS the original fact.

You must be aggressive and thorough in identifying:
- NUMERICAL DISTORTIONS: Inflated/deflated numbers, changed percentages, altered magnitudes
- MISSING CONTEXT: Omitted qualifiers, removed caveats, stripped conditions
- CAUSAL CONFUSION: Implied causation from correlation, reversed cause-effect
- EXAGGERATION: Amplified severity, dramatized outcomes, sensationalized framing
- SCOPE CHANGES: Geographic/temporal scope altered, population changed
- TEMPORAL MISMATCHES: Wrong dates, shifted timeframes, outdated data presented as current
- ADDED INFORMATION: Claims not supported by the source fact
- NEGATION FRAMING: Reframing positive as negative or vice versa

OUTPUT FORMAT (JSON):
{
    "accusations": [
        {
            "type": "mutation_type",
            "evidence": "specific quote or comparison",
            "severity": "high/medium/low",
            "explanation": "why this constitutes a mutation"
        }
    ],
    "overall_assessment": "summary of prosecution case",
    "confidence": 0.0-1.0
}

Be precise. Quote exact phrases. Compare specific numbers. Leave no distortion unexamined."#;

pub const DEFENSE_SYSTEM: &str = r#"You are the DEFENSE ADVOCATE in a fact-verification tribunal. Your role is to argue that the external claim FAITHFULLY represents the original fact, despite any surface-level differences.

You must find legitimate reasons why apparent discrepancies are acceptable:
- REASONABLE ROUNDING: Numbers within acceptable margin for summary/headline
- JOURNALISTIC CONVENTION: Standard practices in news summarization
- SEMANTIC EQUIVALENCE: Different words conveying the same meaning
- IMPLICIT CONTEXT: Information audiences would reasonably understand
- ACCEPTABLE PARAPHRASE: Rephrasing that preserves core meaning
- SCOPE ALIGNMENT: Claim stays within bounds of source fact

For each prosecution accusation, provide a counter-argument if possible.

OUTPUT FORMAT (JSON):
{
    "rebuttals": [
        {
            "accusation_addressed": "which prosecution point",
            "counter_argument": "why this is not a true mutation",
            "justification": "evidence or reasoning"
        }
    ],
    "faithful_elements": ["list of accurately represented aspects"],
    "overall_assessment": "summary of defense case",
    "confidence": 0.0-1.0
}

Be charitable but honest. If a mutation is undeniable, acknowledge it."#;

pub const EPISTEMOLOGIST_SYSTEM: &str = r#"You are the EPISTEMOLOGIST in a fact-verification tribunal. Your role is to assess UNCERTAINTY and EPISTEMIC LIMITS of this verification task.

Analyze:
1. VERIFIABLE vs INTERPRETATION-DEPENDENT: What can be objectively determined vs requires judgment?
2. AMBIGUITY SOURCES: Vague language, missing metadata, context-dependent meaning
3. LEGITIMATE DISAGREEMENT: Where do Prosecutor and Defense have valid competing interpretations?
4. INFORMATION GAPS: What additional information would resolve the dispute?
5. CONFIDENCE CALIBRATION: How certain can we actually be about any verdict?

OUTPUT FORMAT (JSON):
{
    "verifiable_facts": ["list of objectively checkable claims"],
    "interpretation_dependent": ["aspects requiring judgment"],
    "ambiguity_analysis": {
        "source": "what causes ambiguity",
        "impact": "how it affects verdict confidence"
    },
    "prosecution_validity": {
        "strong_points": ["well-supported accusations"],
        "weak_points": ["overreaching or speculative accusations"]
    },
    "defense_validity": {
        "strong_points": ["well-supported rebuttals"],
        "weak_points": ["unconvincing arguments"]
    },
    "recommended_confidence_range": [0.0, 1.0],
    "verdict_recommendation": "faithful/mutated/ambiguous",
    "key_uncertainty": "main factor limiting certainty"
}

Be rigorous. Acknowledge when the evidence genuinely supports multiple interpretations."#;

pub const JURY_FOREMAN_SYSTEM: &str = r#"You are the JURY FOREMAN in a fact-verification tribunal. You must synthesize the debate and deliver a FINAL VERDICT.

You have received:
1. PROSECUTOR's accusations of mutation
2. DEFENSE's rebuttals and faithful interpretation arguments
3. EPISTEMOLOGIST's uncertainty analysis

Your task:
1. Weigh the strength of each argument
2. Identify which accusations survived defense rebuttals
3. Consider epistemic uncertainty in your confidence level
4. Deliver a clear verdict with transparent reasoning

VERDICT OPTIONS:
- FAITHFUL: The claim accurately represents the source fact (minor acceptable variations)
- MUTATED: The claim distorts the source fact in meaningful ways
- AMBIGUOUS: Insufficient evidence or genuine interpretive uncertainty

OUTPUT FORMAT (JSON):
{
    "verdict": "faithful/mutated/ambiguous",
    "confidence": 0.0-1.0,
    "reasoning": {
        "decisive_factors": ["what determined the verdict"],
        "prosecution_points_accepted": ["accusations that held up"],
        "prosecution_points_rejected": ["accusations that were rebutted"],
        "defense_points_accepted": ["rebuttals that succeeded"],
        "uncertainty_acknowledgment": "what we cannot be certain about"
    },
    "mutation_types_identified": ["list if mutated, empty if faithful"],
    "summary": "2-3 sentence verdict explanation for presentation"
}

Be decisive but calibrated. Acknowledge uncertainty without being paralyzed by it."#;

const NO_UNCERTAINTY: &str = "No specific uncertainty identified";

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn evidence_header(case: &Case) -> String {
    format!(
        "ORIGINAL FACT (Source of Truth):\n\"{}\"\n\nEXTERNAL CLAIM (Under Investigation):\n\"{}\"",
        case.truth, case.claim
    )
}

fn key_uncertainty(analysis: &EpistemicAnalysis) -> &str {
    if analysis.key_uncertainty.trim().is_empty() {
        NO_UNCERTAINTY
    } else {
        &analysis.key_uncertainty
    }
}

fn bullets<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn prosecution_opening(case: &Case) -> String {
    format!(
        "EVIDENCE FOR EXAMINATION:\n\n{}\n\nAnalyze this claim-fact pair and present your prosecution case. Identify ALL mutations, distortions, or misrepresentations.",
        evidence_header(case)
    )
}

pub fn defense_opening(case: &Case, prosecution: &ProsecutionBrief) -> String {
    format!(
        "EVIDENCE FOR EXAMINATION:\n\n{}\n\nPROSECUTION'S ACCUSATIONS:\n{}\n\nRespond to the prosecution's case. Provide rebuttals where possible and identify faithfully represented elements.",
        evidence_header(case),
        pretty(prosecution)
    )
}

pub fn epistemology(case: &Case, prosecution: &ProsecutionBrief, defense: &DefenseBrief) -> String {
    format!(
        "EVIDENCE FOR EXAMINATION:\n\n{}\n\nPROSECUTION'S CASE:\n{}\n\nDEFENSE'S CASE:\n{}\n\nAnalyze the epistemic status of this debate. What can we know with certainty? Where is legitimate disagreement? How confident can we be in any verdict?",
        evidence_header(case),
        pretty(prosecution),
        pretty(defense)
    )
}

pub fn foreman(
    case: &Case,
    prosecution: &ProsecutionBrief,
    defense: &DefenseBrief,
    analysis: &EpistemicAnalysis,
) -> String {
    format!(
        "CASE SUMMARY:\n\n{}\n\n=== DEBATE TRANSCRIPT ===\n\nPROSECUTION'S CASE:\n{}\n\nDEFENSE'S CASE:\n{}\n\nEPISTEMOLOGIST'S ANALYSIS:\n{}\n\n=== END TRANSCRIPT ===\n\nDeliberate and deliver your final verdict. Weigh all arguments and provide transparent reasoning.",
        evidence_header(case),
        pretty(prosecution),
        pretty(defense),
        pretty(analysis)
    )
}

/// Later-round prosecution: answer the defense's counter-arguments.
pub fn prosecution_counter(
    case: &Case,
    prosecution: &ProsecutionBrief,
    defense: &DefenseBrief,
    analysis: &EpistemicAnalysis,
) -> String {
    let defense_points = bullets(defense.rebuttals.iter().map(|r| r.counter_argument.as_str()));
    format!(
        r#"CONTINUING DEBATE - PROSECUTOR'S RESPONSE TO DEFENSE

ORIGINAL FACT: "{truth}"
EXTERNAL CLAIM: "{claim}"

YOUR PREVIOUS ACCUSATIONS:
{previous}

DEFENSE'S COUNTER-ARGUMENTS (you must address these):
{defense_points}

EPISTEMOLOGIST'S UNCERTAINTY ANALYSIS:
{uncertainty}

The Defense has challenged your accusations. You must now:
1. **Directly respond** to each of the Defense's counter-arguments listed above
2. Either **strengthen your case** with new evidence OR **acknowledge** where Defense has valid points
3. **Refine your accusations** based on this exchange
4. Maintain intellectual honesty - if Defense makes a strong point, acknowledge it

This is a CONVERSATION - reference what Defense said and respond to it specifically.

Respond with the same JSON format as before (accusations array with type, evidence, severity, explanation)."#,
        truth = case.truth,
        claim = case.claim,
        previous = pretty(&prosecution.accusations),
        defense_points = defense_points,
        uncertainty = key_uncertainty(analysis),
    )
}

/// Later-round defense: answer the prosecution's refined accusations.
pub fn defense_counter(
    case: &Case,
    prosecution: &ProsecutionBrief,
    defense: &DefenseBrief,
    analysis: &EpistemicAnalysis,
) -> String {
    let prosecutor_points = bullets(prosecution.accusations.iter().map(|a| a.explanation.as_str()));
    format!(
        r#"CONTINUING DEBATE - DEFENSE'S RESPONSE TO PROSECUTOR

ORIGINAL FACT: "{truth}"
EXTERNAL CLAIM: "{claim}"

YOUR PREVIOUS REBUTTALS:
{previous}

PROSECUTOR'S ACCUSATIONS (you must address these):
{prosecutor_points}

EPISTEMOLOGIST'S UNCERTAINTY ANALYSIS:
{uncertainty}

The Prosecutor has presented accusations (possibly refined from earlier rounds). You must now:
1. **Directly respond** to each of the Prosecutor's accusations listed above
2. Either **strengthen your defense** with new justifications OR **concede** where Prosecutor makes valid points
3. **Refine your rebuttals** based on this exchange
4. Maintain intellectual honesty - if Prosecutor makes a strong point, acknowledge it

This is a CONVERSATION - reference what Prosecutor said and respond to it specifically.

Respond with the same JSON format as before (rebuttals array with accusation_addressed, counter_argument, justification)."#,
        truth = case.truth,
        claim = case.claim,
        previous = pretty(&defense.rebuttals),
        prosecutor_points = prosecutor_points,
        uncertainty = key_uncertainty(analysis),
    )
}

// ── Panel ────────────────────────────────────────────────────────────────────

pub const FACT_CHECKER_SYSTEM: &str = r#"You are FACT_CHECKER, a precise analyst who compares claims against source facts.

Your job: Identify ANY discrepancy between the claim and the truth, no matter how small.

Focus on:
- Numerical accuracy (exact numbers, percentages, magnitudes)
- Temporal accuracy (dates, timeframes)
- Scope accuracy (geographic, demographic)
- Qualifier accuracy (may/will, some/all, about/exactly)

IMPORTANT: Quote specific text from both claim and truth to support your analysis.

Return JSON:
{
    "verdict": "faithful" | "mutated" | "uncertain",
    "confidence": 0.0-1.0,
    "arguments": [
        {
            "id": "FC1",
            "text": "concise argument statement",
            "evidence_quote": "exact quote from claim vs truth",
            "severity": "high" | "medium" | "low"
        }
    ],
    "reasoning_summary": "2 sentences explaining your position"
}"#;

pub const SKEPTIC_SYSTEM: &str = r#"You are SKEPTIC, a critical analyst who questions whether apparent mutations actually matter.

Your job: Challenge whether discrepancies constitute meaningful distortion or are acceptable simplifications.

Consider:
- Is this normal journalistic rounding/paraphrasing?
- Does the core meaning remain intact?
- Would a reasonable reader be misled?
- Is the "error" within acceptable margin?

IMPORTANT: Be genuinely critical. If the claim preserves the essential truth, defend it.

Return JSON:
{
    "verdict": "faithful" | "mutated" | "uncertain",
    "confidence": 0.0-1.0,
    "arguments": [
        {
            "id": "SK1",
            "text": "concise argument statement",
            "evidence_quote": "relevant quote showing your point",
            "severity": "high" | "medium" | "low"
        }
    ],
    "reasoning_summary": "2 sentences explaining your position"
}"#;

pub const CONTEXTUALIST_SYSTEM: &str = r#"You are CONTEXTUALIST, an analyst who evaluates claims in their broader context.

Your job: Assess whether the claim's framing changes the meaning in ways that matter.

Consider:
- Does omitted context change the interpretation?
- Are causal implications altered?
- Is the emotional/rhetorical framing different?
- What would a typical reader understand vs what's actually true?

IMPORTANT: Focus on meaning and implications, not just literal accuracy.

Return JSON:
{
    "verdict": "faithful" | "mutated" | "uncertain",
    "confidence": 0.0-1.0,
    "arguments": [
        {
            "id": "CX1",
            "text": "concise argument statement",
            "evidence_quote": "relevant quote showing your point",
            "severity": "high" | "medium" | "low"
        }
    ],
    "reasoning_summary": "2 sentences explaining your position"
}"#;

pub const MODERATOR_USER: &str = "Synthesize the debate and deliver the final verdict.";

pub fn stance_system(panelist: Panelist) -> &'static str {
    match panelist {
        Panelist::FactChecker => FACT_CHECKER_SYSTEM,
        Panelist::Skeptic => SKEPTIC_SYSTEM,
        Panelist::Contextualist => CONTEXTUALIST_SYSTEM,
    }
}

pub fn initial_stance_user(case: &Case) -> String {
    format!(
        "Analyze this claim-fact pair:\n\nCLAIM (under investigation):\n\"{}\"\n\nTRUTH (source fact):\n\"{}\"\n\nProvide your initial assessment.",
        case.claim, case.truth
    )
}

/// Round-2 system prompt for `panelist`, given its own stance and the
/// arguments of the other two.
pub fn cross_exam_system(panelist: Panelist, own_stance: &str, other_arguments: &str) -> String {
    format!(
        r#"You are {agent_name} in Round 2 of a fact-verification debate.

You have seen the other agents' arguments from Round 1.

YOUR ORIGINAL STANCE:
{own_stance}

OTHER AGENTS' ARGUMENTS TO RESPOND TO:
{other_arguments}

For EACH argument from other agents, you must either:
1. ATTACK: Explain why the argument is flawed, weak, or irrelevant
2. CONCEDE: Acknowledge the argument is strong and you accept it

Be specific. Quote evidence. Update your confidence if warranted.

Return JSON:
{{
    "responses": [
        {{
            "target_agent": "agent name",
            "target_argument_id": "e.g. FC1",
            "action": "attack" | "concede",
            "response_text": "your specific response (2-3 sentences max)"
        }}
    ],
    "updated_confidence": 0.0-1.0,
    "stance_changed": true | false,
    "new_verdict": "faithful" | "mutated" | "uncertain" (only if changed)
}}"#,
        agent_name = panelist.name(),
        own_stance = own_stance,
        other_arguments = other_arguments,
    )
}

pub fn cross_exam_user(case: &Case) -> String {
    format!("CLAIM: {}\nTRUTH: {}", case.claim, case.truth)
}

pub fn moderator_system(case: &Case, round1_summary: &str, round2_summary: &str) -> String {
    format!(
        r#"You are MODERATOR synthesizing a fact-verification debate.

CLAIM: "{claim}"
TRUTH: "{truth}"

ROUND 1 - INITIAL STANCES:
{round1_summary}

ROUND 2 - CROSS-EXAMINATION:
{round2_summary}

Your task:
1. Identify where agents AGREE (key agreements)
2. Identify what remains DISPUTED (unresolved)
3. Weigh the arguments and deliver a FINAL VERDICT

The verdict should reflect:
- Which arguments survived cross-examination
- Where concessions were made
- The overall weight of evidence

Return JSON:
{{
    "final_verdict": "faithful" | "mutated" | "uncertain",
    "confidence": 0.0-1.0,
    "majority_position": "brief description of majority view",
    "key_agreements": ["point 1", "point 2"],
    "unresolved_disputes": ["dispute 1"],
    "reasoning": "3-4 sentences explaining the verdict and why"
}}"#,
        claim = case.claim,
        truth = case.truth,
        round1_summary = round1_summary,
        round2_summary = round2_summary,
    )
}

// ── Baseline ─────────────────────────────────────────────────────────────────

pub const SINGLE_AGENT_SYSTEM: &str = r#"You are a fact-checking AI that verifies whether external claims faithfully represent source facts.

Your task is to analyze claim-fact pairs and determine if the claim is:
- FAITHFUL: Accurately represents the source fact
- MUTATED: Contains distortions, exaggerations, or misrepresentations
- AMBIGUOUS: Unclear or interpretable either way

Respond with JSON containing:
{
  "verdict": "faithful" | "mutated" | "ambiguous",
  "confidence": 0.0-1.0,
  "reasoning": "brief explanation",
  "mutation_types": ["type1", "type2"] or [],
  "key_evidence": ["evidence point 1", "evidence point 2"]
}

Be decisive and provide a clear verdict."#;

pub fn baseline_user(case: &Case) -> String {
    format!(
        "Analyze this claim-fact pair:\n\nORIGINAL FACT (Source of Truth):\n\"{}\"\n\nEXTERNAL CLAIM (To Verify):\n\"{}\"\n\nDetermine if the claim faithfully represents the fact, is mutated/distorted, or is ambiguous.",
        case.truth, case.claim
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation::tribunal::{Accusation, Rebuttal};

    fn case() -> Case {
        Case::new(1, "more than 1,000 motorists", "a convoy of motorists")
    }

    fn prosecution() -> ProsecutionBrief {
        ProsecutionBrief {
            accusations: vec![Accusation {
                kind: "added_information".into(),
                evidence: "'1,000'".into(),
                severity: None,
                explanation: "The number is invented".into(),
            }],
            overall_assessment: "Fabricated specificity".into(),
            confidence: 0.9,
        }
    }

    fn defense() -> DefenseBrief {
        DefenseBrief {
            rebuttals: vec![
                Rebuttal {
                    accusation_addressed: "added_information".into(),
                    counter_argument: "Convoys are often large".into(),
                    justification: "Common usage".into(),
                },
                Rebuttal {
                    accusation_addressed: "scope".into(),
                    counter_argument: "Location unchanged".into(),
                    justification: "Same protest".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_opening_prompts_quote_both_texts() {
        let prompt = prosecution_opening(&case());
        assert!(prompt.starts_with("EVIDENCE FOR EXAMINATION:"));
        assert!(prompt.contains("ORIGINAL FACT (Source of Truth):\n\"a convoy of motorists\""));
        assert!(prompt.contains("EXTERNAL CLAIM (Under Investigation):\n\"more than 1,000 motorists\""));

        let prompt = defense_opening(&case(), &prosecution());
        assert!(prompt.contains("PROSECUTION'S ACCUSATIONS:\n{\n  \"accusations\""));
        assert!(prompt.contains("\"type\": \"added_information\""));
    }

    #[test]
    fn test_foreman_prompt_carries_all_briefs() {
        let analysis = EpistemicAnalysis::default();
        let prompt = foreman(&case(), &prosecution(), &defense(), &analysis);
        assert!(prompt.starts_with("CASE SUMMARY:"));
        assert!(prompt.contains("=== DEBATE TRANSCRIPT ==="));
        assert!(prompt.contains("EPISTEMOLOGIST'S ANALYSIS:\n{"));
        assert!(prompt.contains("\"recommended_confidence_range\""));
    }

    #[test]
    fn test_counter_prompts_list_opposing_points() {
        let analysis = EpistemicAnalysis {
            key_uncertainty: "Size of the convoy".into(),
            ..Default::default()
        };
        let prompt = prosecution_counter(&case(), &prosecution(), &defense(), &analysis);
        assert!(prompt.contains(
            "DEFENSE'S COUNTER-ARGUMENTS (you must address these):\n- Convoys are often large\n- Location unchanged\n"
        ));
        assert!(prompt.contains("YOUR PREVIOUS ACCUSATIONS:\n[\n"));
        assert!(prompt.contains("EPISTEMOLOGIST'S UNCERTAINTY ANALYSIS:\nSize of the convoy"));

        let prompt = defense_counter(&case(), &prosecution(), &defense(), &EpistemicAnalysis::default());
        assert!(prompt.contains(
            "PROSECUTOR'S ACCUSATIONS (you must address these):\n- The number is invented\n"
        ));
        assert!(prompt.contains("No specific uncertainty identified"));
    }

    #[test]
    fn test_panel_prompts() {
        assert!(stance_system(Panelist::Skeptic).starts_with("You are SKEPTIC"));
        assert!(initial_stance_user(&case()).contains("CLAIM (under investigation):\n\"more than 1,000 motorists\""));

        let system = cross_exam_system(Panelist::Contextualist, "Verdict: mutated", "\nSKEPTIC ...");
        assert!(system.starts_with("You are CONTEXTUALIST in Round 2"));
        assert!(system.contains("YOUR ORIGINAL STANCE:\nVerdict: mutated"));
        assert!(system.contains("Return JSON:\n{\n    \"responses\": ["));

        assert_eq!(
            cross_exam_user(&case()),
            "CLAIM: more than 1,000 motorists\nTRUTH: a convoy of motorists"
        );

        let moderator = moderator_system(&case(), "R1", "R2");
        assert!(moderator.contains("ROUND 1 - INITIAL STANCES:\nR1"));
        assert!(moderator.contains("\"final_verdict\": \"faithful\" | \"mutated\" | \"uncertain\""));
    }

    #[test]
    fn test_baseline_prompt() {
        let prompt = baseline_user(&case());
        assert!(prompt.contains("EXTERNAL CLAIM (To Verify):\n\"more than 1,000 motorists\""));
        assert!(SINGLE_AGENT_SYSTEM.contains("\"key_evidence\""));
    }
}
