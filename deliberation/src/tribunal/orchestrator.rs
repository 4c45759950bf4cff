//! Tribunal orchestrator: sequences the four roles over one case.
//!
//! The orchestrator holds no model client. A driver asks `next_action()`
//! which role to call, performs the call, and submits the parsed brief
//! together with the raw reply text.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::briefs::{DefenseBrief, EpistemicAnalysis, ForemanRuling, ProsecutionBrief};
use super::record::{AgentResponse, CallRecord, DebateResult};
use super::state::{TribunalPhase, TribunalRole, TribunalSession};
use crate::case::Case;

/// Error from the tribunal orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TribunalError {
    /// State transition failed.
    TransitionFailed(String),
    /// Tribunal already adjourned or aborted.
    AlreadyComplete,
    /// Submission does not match the current phase.
    InvalidPhase { expected: String, actual: String },
}

impl std::fmt::Display for TribunalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransitionFailed(msg) => write!(f, "transition failed: {}", msg),
            Self::AlreadyComplete => write!(f, "tribunal already complete"),
            Self::InvalidPhase { expected, actual } => {
                write!(f, "expected phase {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for TribunalError {}

/// What the orchestrator expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// Call the Prosecutor (opening in round 1, counter-response after).
    AwaitProsecutor,
    /// Call the Defense (opening in round 1, counter-response after).
    AwaitDefense,
    AwaitEpistemologist,
    AwaitForeman,
    /// Tribunal finished; call `outcome()`.
    Complete,
}

impl NextAction {
    /// The role to call, if any.
    pub fn role(self) -> Option<TribunalRole> {
        match self {
            Self::AwaitProsecutor => Some(TribunalRole::Prosecutor),
            Self::AwaitDefense => Some(TribunalRole::Defense),
            Self::AwaitEpistemologist => Some(TribunalRole::Epistemologist),
            Self::AwaitForeman => Some(TribunalRole::JuryForeman),
            Self::Complete => None,
        }
    }
}

impl std::fmt::Display for NextAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitProsecutor => write!(f, "await_prosecutor"),
            Self::AwaitDefense => write!(f, "await_defense"),
            Self::AwaitEpistemologist => write!(f, "await_epistemologist"),
            Self::AwaitForeman => write!(f, "await_foreman"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Drives one case through opening, counter rounds, and deliberation.
///
/// Usage:
/// 1. Create with `new()` and call `start()`
/// 2. Loop on `next_action()`, submitting the matching brief
/// 3. After `Complete`, `outcome()` yields the `DebateResult`
pub struct TribunalOrchestrator {
    session: TribunalSession,
    case: Case,
    prosecution: Option<ProsecutionBrief>,
    defense: Option<DefenseBrief>,
    epistemology: Option<EpistemicAnalysis>,
    ruling: Option<ForemanRuling>,
    calls: Vec<CallRecord>,
}

impl TribunalOrchestrator {
    pub fn new(case: Case, rounds: u32) -> Self {
        Self {
            session: TribunalSession::new(case.id, rounds),
            case,
            prosecution: None,
            defense: None,
            epistemology: None,
            ruling: None,
            calls: Vec::new(),
        }
    }

    /// Open the tribunal: transitions from Idle to Prosecution.
    pub fn start(&mut self) -> Result<(), TribunalError> {
        self.session
            .start()
            .map_err(|e| TribunalError::TransitionFailed(e.to_string()))
    }

    /// What action is expected next.
    pub fn next_action(&self) -> NextAction {
        match self.session.phase {
            TribunalPhase::Idle | TribunalPhase::Prosecution => NextAction::AwaitProsecutor,
            TribunalPhase::Defense => NextAction::AwaitDefense,
            TribunalPhase::Epistemology => NextAction::AwaitEpistemologist,
            TribunalPhase::Deliberation => NextAction::AwaitForeman,
            TribunalPhase::Adjourned | TribunalPhase::Aborted => NextAction::Complete,
        }
    }

    /// Whether the current round answers earlier briefs.
    pub fn is_counter_round(&self) -> bool {
        self.session.current_round > 1
    }

    fn expect_phase(&self, expected: TribunalPhase) -> Result<(), TribunalError> {
        if self.session.is_complete() {
            return Err(TribunalError::AlreadyComplete);
        }
        if self.session.phase != expected {
            return Err(TribunalError::InvalidPhase {
                expected: expected.to_string(),
                actual: self.session.phase.to_string(),
            });
        }
        Ok(())
    }

    fn advance(&mut self, to: TribunalPhase, reason: &str) -> Result<(), TribunalError> {
        self.session
            .transition(to, reason)
            .map_err(|e| TribunalError::TransitionFailed(e.to_string()))
    }

    fn log_call(&mut self, role: TribunalRole, raw: String) {
        let label = role.call_label(self.session.current_round);
        debug!(
            case_id = self.case.id,
            round = self.session.current_round,
            agent = label,
            "recorded tribunal call"
        );
        self.calls.push(CallRecord::new(label, raw));
    }

    /// Submit the Prosecutor's brief and hand the floor to the Defense.
    pub fn submit_prosecution(
        &mut self,
        brief: ProsecutionBrief,
        raw: String,
    ) -> Result<NextAction, TribunalError> {
        self.expect_phase(TribunalPhase::Prosecution)?;
        self.log_call(TribunalRole::Prosecutor, raw);
        let reason = format!("{} accusations filed", brief.accusations.len());
        self.prosecution = Some(brief);
        self.advance(TribunalPhase::Defense, &reason)?;
        Ok(self.next_action())
    }

    /// Submit the Defense brief and hand the floor to the Epistemologist.
    pub fn submit_defense(
        &mut self,
        brief: DefenseBrief,
        raw: String,
    ) -> Result<NextAction, TribunalError> {
        self.expect_phase(TribunalPhase::Defense)?;
        self.log_call(TribunalRole::Defense, raw);
        let reason = format!("{} rebuttals filed", brief.rebuttals.len());
        self.defense = Some(brief);
        self.advance(TribunalPhase::Epistemology, &reason)?;
        Ok(self.next_action())
    }

    /// Submit the uncertainty analysis; opens the next round while rounds
    /// remain, otherwise moves to deliberation.
    pub fn submit_epistemology(
        &mut self,
        analysis: EpistemicAnalysis,
        raw: String,
    ) -> Result<NextAction, TribunalError> {
        self.expect_phase(TribunalPhase::Epistemology)?;
        self.log_call(TribunalRole::Epistemologist, raw);
        self.epistemology = Some(analysis);
        if self.session.has_rounds_remaining() {
            let reason = format!("round {} complete", self.session.current_round);
            self.advance(TribunalPhase::Prosecution, &reason)?;
        } else {
            self.advance(TribunalPhase::Deliberation, "rounds exhausted")?;
        }
        Ok(self.next_action())
    }

    /// Submit the Jury Foreman's ruling and adjourn.
    pub fn submit_ruling(
        &mut self,
        ruling: ForemanRuling,
        raw: String,
    ) -> Result<NextAction, TribunalError> {
        self.expect_phase(TribunalPhase::Deliberation)?;
        self.log_call(TribunalRole::JuryForeman, raw);
        let reason = format!("verdict {}", ruling.verdict);
        self.ruling = Some(ruling);
        self.advance(TribunalPhase::Adjourned, &reason)?;
        Ok(NextAction::Complete)
    }

    /// Abort the tribunal.
    pub fn abort(&mut self, reason: &str) -> Result<(), TribunalError> {
        if self.session.is_complete() {
            return Err(TribunalError::AlreadyComplete);
        }
        self.advance(TribunalPhase::Aborted, reason)
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// The result of an adjourned tribunal; `None` before adjournment or
    /// after an abort.
    pub fn outcome(&self) -> Option<DebateResult> {
        if self.session.phase != TribunalPhase::Adjourned {
            return None;
        }
        let ruling = self.ruling.clone()?;
        let prosecution = self.prosecution.clone().unwrap_or_default();
        let defense = self.defense.clone().unwrap_or_default();
        let epistemology = self.epistemology.clone().unwrap_or_default();

        Some(DebateResult {
            case_id: self.case.id,
            claim: self.case.claim.clone(),
            truth: self.case.truth.clone(),
            rounds: self.session.current_round,
            prosecutor_response: AgentResponse::from_prosecution(&prosecution),
            defense_response: AgentResponse::from_defense(&defense),
            epistemologist_response: AgentResponse::from_epistemology(&epistemology),
            final_verdict: ruling.verdict,
            verdict_reasoning: ruling.summary.clone(),
            confidence: ruling.confidence,
            ruling,
            debate_transcript: self.calls.clone(),
        })
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn session(&self) -> &TribunalSession {
        &self.session
    }

    /// Latest prosecution brief.
    pub fn prosecution(&self) -> Option<&ProsecutionBrief> {
        self.prosecution.as_ref()
    }

    /// Latest defense brief.
    pub fn defense(&self) -> Option<&DefenseBrief> {
        self.defense.as_ref()
    }

    /// Latest uncertainty analysis.
    pub fn epistemology(&self) -> Option<&EpistemicAnalysis> {
        self.epistemology.as_ref()
    }

    /// Raw call log so far.
    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn current_round(&self) -> u32 {
        self.session.current_round
    }
}
