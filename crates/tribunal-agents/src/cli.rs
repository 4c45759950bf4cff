//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use deliberation::{CaseError, CaseSelection};

use crate::config::CliOverrides;

/// Multi-agent claim verification: tribunal, panel, and single-agent baseline
#[derive(Parser, Debug)]
#[command(name = "tribunal", author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to ./tribunal.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides OPENAI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Chat API base URL (overrides OPENAI_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Use the larger presentation models
    #[arg(long, global = true, default_value_t = false)]
    pub presentation: bool,

    /// Case file, CSV with claim/truth columns or a JSON array
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            presentation: self.presentation,
            data: self.data.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the adversarial tribunal (Prosecutor, Defense, Epistemologist, Jury Foreman)
    Debate {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Debate rounds before the ruling (random 2-4 when omitted)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: Option<u32>,

        #[arg(long, default_value = "debate_results.json")]
        output: PathBuf,
    },

    /// Run the three-round panel (stances, cross-examination, consensus)
    Panel {
        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(long, default_value = "debate_transcript.json")]
        output: PathBuf,
    },

    /// Run the single-agent baseline
    Baseline {
        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(long, default_value = "single_agent_results.json")]
        output: PathBuf,
    },

    /// Run baseline and tribunal on the first N cases and compare them
    Compare {
        /// Number of cases from the start of the dataset
        #[arg(long, default_value_t = 2)]
        limit: usize,

        /// Debate rounds for the tribunal side (random 2-4 when omitted)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: Option<u32>,

        /// Directory for the result files, report and visualization data
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// List the loaded cases
    Cases,

    /// Show raw model replies from a saved tribunal run
    Inspect {
        /// Case to show; lists available cases when omitted
        #[arg(long)]
        case: Option<usize>,

        #[arg(long, default_value = "debate_results.json")]
        input: PathBuf,
    },
}

/// Which cases to run. With no flag, the strategic showcase set is used.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// A single case id
    #[arg(long, conflicts_with_all = ["cases", "all", "interactive"])]
    pub case: Option<usize>,

    /// Comma-separated case ids, e.g. 0,1,5
    #[arg(long, value_name = "IDS", conflicts_with_all = ["all", "interactive"])]
    pub cases: Option<String>,

    /// Every loaded case
    #[arg(long, default_value_t = false, conflicts_with = "interactive")]
    pub all: bool,

    /// List cases and prompt for ids on stdin
    #[arg(long, default_value_t = false)]
    pub interactive: bool,
}

impl SelectionArgs {
    /// The selection named by the flags. Interactive mode is handled by the
    /// caller before this is consulted.
    pub fn selection(&self) -> Result<CaseSelection, CaseError> {
        if let Some(id) = self.case {
            return Ok(CaseSelection::Single(id));
        }
        if let Some(raw) = &self.cases {
            return CaseSelection::parse_list(raw);
        }
        if self.all {
            return Ok(CaseSelection::All);
        }
        Ok(CaseSelection::Strategic)
    }
}
