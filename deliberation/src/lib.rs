//! Deliberation: deterministic core of the claim-verification jury
//!
//! This library holds everything about a jury run that does not talk to a
//! model: the cases, the verdict vocabulary, the briefs each role returns,
//! the tribunal state machine, the three-round panel transcript, the
//! single-agent baseline record, and the comparison, rendering and export of
//! results.
//!
//! # Protocols
//!
//! - **Tribunal**: Prosecutor → Defense → Epistemologist for N rounds, then a
//!   Jury Foreman ruling. See [`tribunal`].
//! - **Panel**: FACT_CHECKER, SKEPTIC and CONTEXTUALIST state, cross-examine,
//!   and a MODERATOR synthesizes. See [`panel`].
//! - **Baseline**: a single direct verdict, used as a comparison point.

pub mod baseline;
pub mod case;
pub mod comparison;
pub mod export;
pub mod lenient;
pub mod panel;
pub mod render;
pub mod tribunal;
pub mod verdict;

pub use baseline::BaselineResult;
pub use case::{
    load_cases, strategic_case, Case, CaseError, CaseSelection, ExpectationCheck, StrategicCase,
    STRATEGIC_CASES,
};
pub use comparison::{Comparison, ComparisonCase, ComparisonStatistics};
pub use export::{DebateExport, ExportError};
pub use panel::{PanelBundle, PanelTranscript, Panelist};
pub use tribunal::{DebateResult, NextAction, TribunalError, TribunalOrchestrator};
pub use verdict::{MutationType, Severity, Verdict, VerdictCounts};
