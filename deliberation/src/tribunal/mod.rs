//! Adversarial Tribunal: Prosecutor, Defense, Epistemologist, Jury Foreman
//!
//! State machine for a courtroom-style debate over one claim/fact case.
//! Each round the prosecution accuses, the defense rebuts, and the
//! epistemologist weighs the uncertainty; the foreman then rules.
//!
//! # Tribunal Flow
//!
//! ```text
//! Idle → Prosecution → Defense → Epistemology → [rounds left?]
//!   │        ▲                                     │
//!   │        └──────────── Yes ────────────────────┤
//!   │                                              └─ No → Deliberation → Adjourned
//!   └─ abort at any point → Aborted
//! ```

pub mod briefs;
pub mod orchestrator;
pub mod record;
pub mod state;

use std::ops::RangeInclusive;

pub use briefs::{
    Accusation, AmbiguityAnalysis, ArgumentValidity, DefenseBrief, EpistemicAnalysis,
    ForemanRuling, ProsecutionBrief, Rebuttal, RulingReasoning,
};
pub use orchestrator::{NextAction, TribunalError, TribunalOrchestrator};
pub use record::{AgentResponse, CallRecord, DebateResult};
pub use state::{TransitionError, TribunalPhase, TribunalRole, TribunalSession, TribunalTransition};

/// Round counts drawn from when the caller does not fix one.
pub const DEFAULT_ROUND_RANGE: RangeInclusive<u32> = 2..=4;
