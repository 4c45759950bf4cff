//! Tribunal state machine: phases, transitions, and session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of a tribunal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TribunalPhase {
    /// Session created but not started.
    Idle,
    /// Prosecutor is presenting or refining accusations.
    Prosecution,
    /// Defense is answering the prosecution.
    Defense,
    /// Epistemologist is weighing both sides.
    Epistemology,
    /// Jury Foreman is synthesizing the verdict.
    Deliberation,
    /// Verdict delivered.
    Adjourned,
    /// Stopped by a failed call or intervention.
    Aborted,
}

impl TribunalPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Adjourned | Self::Aborted)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [TribunalPhase] {
        match self {
            Self::Idle => &[Self::Prosecution, Self::Aborted],
            Self::Prosecution => &[Self::Defense, Self::Aborted],
            Self::Defense => &[Self::Epistemology, Self::Aborted],
            Self::Epistemology => &[Self::Prosecution, Self::Deliberation, Self::Aborted],
            Self::Deliberation => &[Self::Adjourned, Self::Aborted],
            Self::Adjourned | Self::Aborted => &[],
        }
    }
}

impl std::fmt::Display for TribunalPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Prosecution => write!(f, "prosecution"),
            Self::Defense => write!(f, "defense"),
            Self::Epistemology => write!(f, "epistemology"),
            Self::Deliberation => write!(f, "deliberation"),
            Self::Adjourned => write!(f, "adjourned"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Role prompted during a tribunal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TribunalRole {
    Prosecutor,
    Defense,
    Epistemologist,
    JuryForeman,
}

impl TribunalRole {
    /// Label recorded in the raw call log. Prosecutor and Defense calls after
    /// the opening round are marked as counter-responses.
    pub fn call_label(self, round: u32) -> &'static str {
        match (self, round > 1) {
            (Self::Prosecutor, false) => "Prosecutor",
            (Self::Prosecutor, true) => "Prosecutor (Counter)",
            (Self::Defense, false) => "Defense",
            (Self::Defense, true) => "Defense (Counter)",
            (Self::Epistemologist, _) => "Epistemologist",
            (Self::JuryForeman, _) => "Jury Foreman",
        }
    }
}

impl std::fmt::Display for TribunalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prosecutor => write!(f, "Prosecutor"),
            Self::Defense => write!(f, "Defense"),
            Self::Epistemologist => write!(f, "Epistemologist"),
            Self::JuryForeman => write!(f, "Jury Foreman"),
        }
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TribunalTransition {
    pub from: TribunalPhase,
    pub to: TribunalPhase,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: TribunalPhase,
    pub to: TribunalPhase,
    pub reason: String,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} → {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for TransitionError {}

/// A tribunal session over one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TribunalSession {
    pub case_id: usize,
    pub phase: TribunalPhase,
    /// Current round (1-indexed once started).
    pub current_round: u32,
    /// Number of prosecution/defense/epistemology rounds before deliberation.
    pub planned_rounds: u32,
    pub transitions: Vec<TribunalTransition>,
    pub created_at: DateTime<Utc>,
}

impl TribunalSession {
    /// Create a session; at least one round is always planned.
    pub fn new(case_id: usize, planned_rounds: u32) -> Self {
        Self {
            case_id,
            phase: TribunalPhase::Idle,
            current_round: 0,
            planned_rounds: planned_rounds.max(1),
            transitions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Transition to a new phase with a reason.
    pub fn transition(&mut self, to: TribunalPhase, reason: &str) -> Result<(), TransitionError> {
        if !self.phase.valid_transitions().contains(&to) {
            return Err(TransitionError {
                from: self.phase,
                to,
                reason: format!(
                    "not a valid transition (allowed: {:?})",
                    self.phase.valid_transitions()
                ),
            });
        }

        self.transitions.push(TribunalTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.phase = to;

        if to == TribunalPhase::Prosecution {
            self.current_round += 1;
        }

        Ok(())
    }

    /// Open the tribunal (Idle → Prosecution).
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(TribunalPhase::Prosecution, "tribunal opened")
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn has_rounds_remaining(&self) -> bool {
        self.current_round < self.planned_rounds
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] round {}/{} | case={}",
            self.phase, self.current_round, self.planned_rounds, self.case_id
        )
    }
}
