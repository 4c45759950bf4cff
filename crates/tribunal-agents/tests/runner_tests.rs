//! Runner integration tests against in-process chat backends.
//!
//! No network: a scripted backend replays canned replies in order and keeps
//! every request for inspection, and a mockall mock answers by role.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mockall::mock;
use tribunal_agents::prompts;
use tribunal_agents::{
    AgentError, BaselineVerifier, ChatBackend, ChatRequest, LlmError, PanelRunner,
    TribunalRunner,
};

use deliberation::panel::{ExamAction, Panelist};
use deliberation::{Case, MutationType, Verdict};

// ── Helpers ──────────────────────────────────────────────────────────────────

struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_failure_at(self, index: usize, err: LlmError) -> Self {
        {
            let mut replies = self.replies.lock().unwrap();
            replies.insert(index, Err(err));
        }
        self
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

mock! {
    pub Backend {}

    #[async_trait]
    impl ChatBackend for Backend {
        async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
    }
}

fn motorists() -> Case {
    Case::new(
        1,
        "More than 1,000 motorists joined the protest in Lansing",
        "A convoy of motorists joined the protest in Lansing",
    )
}

const PROSECUTION: &str = r#"{"accusations":[{"type":"added_information","evidence":"'more than 1,000'","severity":"high","explanation":"The source gives no count"}],"overall_assessment":"Invented number","confidence":0.9}"#;
const DEFENSE: &str = r#"{"rebuttals":[{"accusation_addressed":"added_information","counter_argument":"Convoys can plausibly exceed 1,000","justification":"Media estimates"}],"faithful_elements":["Location"],"overall_assessment":"Mostly faithful","confidence":0.35}"#;
const EPISTEMOLOGY: &str = r#"{"verifiable_facts":["No number in source"],"recommended_confidence_range":[0.7,0.85],"verdict_recommendation":"mutated","key_uncertainty":"Actual convoy size"}"#;
const PROSECUTION_COUNTER: &str = r#"{"accusations":[{"type":"added_information","evidence":"'1,000'","severity":"high","explanation":"Plausibility is not support"}],"overall_assessment":"Stands","confidence":0.88}"#;
const DEFENSE_COUNTER: &str = r#"{"rebuttals":[{"accusation_addressed":"added_information","counter_argument":"Concede the figure is unsupported","justification":"No source count"}],"confidence":0.2}"#;
const RULING: &str = r#"{"verdict":"Mutated","confidence":0.85,"reasoning":{"decisive_factors":["Unsupported figure"]},"mutation_types_identified":["added_information"],"summary":"The claim adds a count absent from the source."}"#;

// ── Tribunal ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tribunal_two_rounds_feeds_counter_prompts() {
    let backend = ScriptedBackend::new([
        PROSECUTION,
        DEFENSE,
        EPISTEMOLOGY,
        PROSECUTION_COUNTER,
        DEFENSE_COUNTER,
        EPISTEMOLOGY,
        RULING,
    ]);
    let runner = TribunalRunner::new(&backend, "gpt-4.1-mini", 0.7);

    let result = runner.run_case(&motorists(), Some(2)).await.unwrap();

    assert_eq!(result.final_verdict, Verdict::Mutated);
    assert_eq!(result.confidence, 0.85);
    assert_eq!(result.rounds, 2);
    assert_eq!(result.verdict_reasoning, "The claim adds a count absent from the source.");
    assert_eq!(
        result.prosecutor_response.mutation_types,
        vec![MutationType::AddedInformation]
    );
    assert_eq!(result.defense_response.confidence, 0.2);
    assert_eq!(result.llm_calls(), 7);
    assert_eq!(result.debate_transcript[3].agent, "Prosecutor (Counter)");
    assert_eq!(result.debate_transcript[4].agent, "Defense (Counter)");
    assert_eq!(result.debate_transcript[6].response, RULING);

    let requests = backend.requests();
    assert_eq!(requests.len(), 7);
    assert!(requests.iter().all(|r| r.model == "gpt-4.1-mini" && r.temperature == 0.7));
    assert_eq!(requests[0].system_prompt(), prompts::PROSECUTOR_SYSTEM);
    assert_eq!(requests[6].system_prompt(), prompts::JURY_FOREMAN_SYSTEM);

    // Round 2 prosecution answers the round 1 defense.
    let prosecutor_counter = requests[3].user_prompt();
    assert!(prosecutor_counter.starts_with("CONTINUING DEBATE - PROSECUTOR'S RESPONSE TO DEFENSE"));
    assert!(prosecutor_counter.contains("- Convoys can plausibly exceed 1,000"));
    assert!(prosecutor_counter.contains("Actual convoy size"));

    // Round 2 defense answers the refined prosecution from the same round.
    let defense_counter = requests[4].user_prompt();
    assert!(defense_counter.starts_with("CONTINUING DEBATE - DEFENSE'S RESPONSE TO PROSECUTOR"));
    assert!(defense_counter.contains("- Plausibility is not support"));
    assert!(!defense_counter.contains("- The source gives no count"));

    // The foreman sees the latest briefs.
    assert!(requests[6].user_prompt().contains("Concede the figure is unsupported"));
}

#[tokio::test]
async fn test_tribunal_call_failure_aborts_case() {
    let backend = ScriptedBackend::new([PROSECUTION, DEFENSE]).with_failure_at(
        2,
        LlmError::Api {
            status: 429,
            body: "rate limited".into(),
        },
    );
    let runner = TribunalRunner::new(&backend, "gpt-4.1-mini", 0.7);

    let err = runner.run_case(&motorists(), Some(1)).await.unwrap_err();
    assert!(matches!(
        &err,
        AgentError::Llm { agent, source: LlmError::Api { status: 429, .. } } if agent == "Epistemologist"
    ));
    assert!(err.is_case_failure());
    assert_eq!(backend.requests().len(), 3);
}

#[tokio::test]
async fn test_tribunal_batch_continues_after_failed_case() {
    let backend = ScriptedBackend::new([
        "this is not json",
        PROSECUTION,
        DEFENSE,
        EPISTEMOLOGY,
        RULING,
    ]);
    let runner = TribunalRunner::new(&backend, "gpt-4.1", 0.7);
    let first = Case::new(0, "Less than 14,550 died", "More than 14,500 died");
    let second = motorists();

    let mut seen = Vec::new();
    let report = runner
        .run_cases(&[&first, &second], Some(1), |case, _| seen.push(case.id))
        .await;

    assert_eq!(seen, vec![1]);
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].case_id, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].case_id, 0);
    assert!(report.failures[0].error.contains("Prosecutor call failed"));
}

#[tokio::test]
async fn test_tribunal_answers_by_role_with_mock() {
    let mut backend = MockBackend::new();
    backend
        .expect_complete()
        .times(4)
        .returning(|request: &ChatRequest| {
            let reply = match request.system_prompt() {
                s if s == prompts::PROSECUTOR_SYSTEM => PROSECUTION,
                s if s == prompts::DEFENSE_SYSTEM => DEFENSE,
                s if s == prompts::EPISTEMOLOGIST_SYSTEM => EPISTEMOLOGY,
                _ => r#"{"verdict":"ambiguous","confidence":0.5,"summary":"Unclear"}"#,
            };
            Ok(reply.to_string())
        });
    let runner = TribunalRunner::new(&backend, "gpt-4.1-mini", 0.7);

    let result = runner.run_case(&motorists(), Some(1)).await.unwrap();
    assert_eq!(result.final_verdict, Verdict::Ambiguous);
    assert_eq!(result.epistemologist_response.confidence, 0.85);
    assert_eq!(
        result
            .debate_transcript
            .iter()
            .map(|c| c.agent.as_str())
            .collect::<Vec<_>>(),
        vec!["Prosecutor", "Defense", "Epistemologist", "Jury Foreman"]
    );
}

// ── Panel ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_panel_three_rounds() {
    let backend = ScriptedBackend::new([
        r#"{"verdict":"mutated","confidence":0.9,"arguments":[{"id":"FC1","text":"Count is invented","evidence_quote":"more than 1,000","severity":"high"}],"reasoning_summary":"Number not in source."}"#,
        r#"{"verdict":"faithful","confidence":0.6,"arguments":[{"text":"Convoys are large"}],"reasoning_summary":"Core meaning intact."}"#,
        r#"{"verdict":"uncertain","confidence":0.5,"arguments":[],"reasoning_summary":"Framing unclear."}"#,
        r#"{"responses":[{"target_agent":"SKEPTIC","target_argument_id":"SK1","action":"attack","response_text":"Size is speculation."}],"updated_confidence":0.92,"stance_changed":false}"#,
        r#"{"responses":[{"target_agent":"FACT_CHECKER","target_argument_id":"FC1","action":"concede","response_text":"Fair, no count given."}],"updated_confidence":0.4,"stance_changed":true,"new_verdict":"mutated"}"#,
        r#"{"responses":[],"updated_confidence":0.7,"stance_changed":false}"#,
        r#"{"final_verdict":"mutated","confidence":0.85,"majority_position":"Count is fabricated","key_agreements":["No number in source"],"unresolved_disputes":[],"reasoning":"Skeptic conceded."}"#,
    ]);
    let runner = PanelRunner::new(&backend, "gpt-4o-mini", 0.7);

    let transcript = runner.run_case(&motorists()).await.unwrap();
    let rounds = &transcript.rounds;

    assert_eq!(transcript.model, "gpt-4o-mini");
    assert_eq!(rounds.round1_initial_stances.len(), 3);
    assert_eq!(rounds.round1_initial_stances[1].agent, Panelist::Skeptic);
    assert_eq!(rounds.round1_initial_stances[1].arguments[0].id, "SK1");
    assert_eq!(rounds.round1_initial_stances[2].verdict, Verdict::Ambiguous);

    assert_eq!(rounds.round2_cross_examination.len(), 2);
    assert_eq!(rounds.round2_cross_examination[1].agent, Panelist::Skeptic);
    assert_eq!(rounds.round2_cross_examination[1].action, ExamAction::Concede);
    assert_eq!(rounds.round2_cross_examination[1].updated_confidence, 0.4);
    assert_eq!(rounds.round2_stance_updates.len(), 3);
    assert_eq!(rounds.round2_stance_updates[1].new_verdict, Some(Verdict::Mutated));

    assert_eq!(transcript.consensus().final_verdict, Verdict::Mutated);

    let requests = backend.requests();
    assert_eq!(requests.len(), 7);
    assert_eq!(requests[0].system_prompt(), prompts::FACT_CHECKER_SYSTEM);
    assert!(requests[0].user_prompt().ends_with("Provide your initial assessment."));
    assert!(requests[3].system_prompt().starts_with("You are FACT_CHECKER in Round 2"));
    assert!(requests[3].system_prompt().contains("  [SK1] Convoys are large"));
    assert!(!requests[3].system_prompt().contains("  [FC1] Count is invented"));
    assert!(requests[3].user_prompt().starts_with("CLAIM: More than 1,000"));
    assert!(requests[6].system_prompt().contains("FACT_CHECKER: mutated (90%)"));
    assert!(requests[6]
        .system_prompt()
        .contains("SKEPTIC concedes FACT_CHECKER's [FC1]: Fair, no count given."));
    assert_eq!(requests[6].user_prompt(), prompts::MODERATOR_USER);

    let json = serde_json::to_value(&transcript).unwrap();
    assert_eq!(json["rounds"]["round1_initial_stances"][0]["agent"], "FACT_CHECKER");
    assert_eq!(json["rounds"]["round2_cross_examination"][0]["action"], "attack");
    assert_eq!(json["rounds"]["round3_consensus"]["final_verdict"], "mutated");
}

#[tokio::test]
async fn test_panel_failure_names_moderator() {
    let stance = r#"{"verdict":"faithful","confidence":0.5,"arguments":[],"reasoning_summary":""}"#;
    let exam = r#"{"responses":[],"updated_confidence":0.5,"stance_changed":false}"#;
    let backend = ScriptedBackend::new([stance, stance, stance, exam, exam, exam]);
    let runner = PanelRunner::new(&backend, "gpt-4o-mini", 0.7);

    let err = runner.run_case(&motorists()).await.unwrap_err();
    assert!(matches!(err, AgentError::Llm { ref agent, source: LlmError::EmptyContent } if agent == "MODERATOR"));
}

// ── Baseline ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_baseline_single_call() {
    let mut backend = MockBackend::new();
    backend
        .expect_complete()
        .withf(|request: &ChatRequest| {
            request.system_prompt() == prompts::SINGLE_AGENT_SYSTEM
                && request.user_prompt().contains("EXTERNAL CLAIM (To Verify):")
                && request.model == "gpt-4.1-mini"
        })
        .times(1)
        .returning(|_| {
            Ok(r#"{"verdict":"mutated","confidence":0.8,"reasoning":"Adds a count","mutation_types":["added_information"],"key_evidence":["1,000"]}"#.to_string())
        });
    let verifier = BaselineVerifier::new(&backend, "gpt-4.1-mini", 0.7);

    let result = verifier.verify(&motorists()).await.unwrap();
    assert_eq!(result.case_id, 1);
    assert_eq!(result.verdict, Verdict::Mutated);
    assert_eq!(result.mutation_types, vec![MutationType::AddedInformation]);
    assert_eq!(result.key_evidence, vec!["1,000"]);
    assert_eq!(result.raw_response["confidence"], 0.8);
}

#[tokio::test]
async fn test_baseline_batch_skips_bad_reply() {
    let backend = ScriptedBackend::new(["[]", r#"{"verdict":"faithful","confidence":0.95}"#]);
    let verifier = BaselineVerifier::new(&backend, "gpt-4.1-mini", 0.7);
    let a = Case::new(6, "claim a", "truth a");
    let b = Case::new(7, "claim b", "truth b");

    let report = verifier.verify_cases(&[&a, &b], |_| {}).await;
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].case_id, 7);
    assert_eq!(report.failures[0].case_id, 6);
}
