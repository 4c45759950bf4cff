//! Three-Round Panel: initial stances, cross-examination, moderated consensus
//!
//! Three panelists judge a case independently, then attack or concede each
//! other's arguments, and a moderator synthesizes the verdict.
//!
//! ```text
//! Round 1: FACT_CHECKER, SKEPTIC, CONTEXTUALIST → InitialStance each
//! Round 2: each panelist answers the others     → CrossExamResponse*
//! Round 3: MODERATOR reads rounds 1–2          → ConsensusResult
//! ```

pub mod stance;
pub mod transcript;

use serde::{Deserialize, Serialize};

pub use stance::{
    Argument, ConsensusResult, CrossExamReply, CrossExamResponse, ExamAction, InitialStance,
    StanceReply, StanceUpdate,
};
pub use transcript::{
    other_arguments_text, own_stance_text, round1_summary, round2_summary, PanelBundle,
    PanelRounds, PanelTranscript,
};

/// Label used for the synthesizing role.
pub const MODERATOR: &str = "MODERATOR";

/// A panel member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Panelist {
    FactChecker,
    Skeptic,
    Contextualist,
}

impl Panelist {
    /// Speaking order.
    pub const ALL: [Panelist; 3] = [Self::FactChecker, Self::Skeptic, Self::Contextualist];

    pub fn name(self) -> &'static str {
        match self {
            Self::FactChecker => "FACT_CHECKER",
            Self::Skeptic => "SKEPTIC",
            Self::Contextualist => "CONTEXTUALIST",
        }
    }

    /// Prefix for argument ids, e.g. `FC` in `FC1`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::FactChecker => "FC",
            Self::Skeptic => "SK",
            Self::Contextualist => "CX",
        }
    }

    /// The other two panelists, in speaking order.
    pub fn others(self) -> impl Iterator<Item = Panelist> {
        Self::ALL.into_iter().filter(move |p| *p != self)
    }
}

impl std::fmt::Display for Panelist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
