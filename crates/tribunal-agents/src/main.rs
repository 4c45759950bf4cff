use std::io::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use deliberation::export::{export_baseline, export_debates, load_debate_exports, write_json_pretty, write_text};
use deliberation::panel::PanelBundle;
use deliberation::render;
use deliberation::verdict::percent;
use deliberation::{load_cases, strategic_case, Case, CaseSelection, Comparison};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use tribunal_agents::cli::{Cli, Command, SelectionArgs};
use tribunal_agents::{
    BaselineVerifier, BatchReport, JuryConfig, OpenAiChat, PanelRunner, TribunalRunner,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = JuryConfig::load(cli.config.as_deref(), &cli.overrides())?;
    info!(
        base_url = %config.base_url,
        profile = ?config.profile,
        data = %config.data_path.display(),
        "jury configured"
    );

    match cli.command {
        Command::Debate {
            selection,
            rounds,
            output,
        } => run_debate(&config, &selection, rounds, &output).await,
        Command::Panel { selection, output } => run_panel(&config, &selection, &output).await,
        Command::Baseline { selection, output } => {
            run_baseline(&config, &selection, &output).await
        }
        Command::Compare {
            limit,
            rounds,
            output_dir,
        } => run_compare(&config, limit, rounds, &output_dir).await,
        Command::Cases => {
            let cases = read_cases(&config, None)?;
            println!("{}", render::case_list(&cases));
            Ok(())
        }
        Command::Inspect { case, input } => inspect(case, &input),
    }
}

fn read_cases(config: &JuryConfig, limit: Option<usize>) -> Result<Vec<Case>> {
    let cases = load_cases(&config.data_path, limit)
        .with_context(|| format!("loading cases from {}", config.data_path.display()))?;
    println!("Loaded {} claim-truth pairs from {}", cases.len(), config.data_path.display());
    Ok(cases)
}

async fn choose_cases<'a>(cases: &'a [Case], args: &SelectionArgs) -> Result<Vec<&'a Case>> {
    let selection = if args.interactive {
        println!("{}", render::case_list(cases));
        print!("\nEnter case numbers to analyze (comma-separated): ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .context("reading case selection")?;
        CaseSelection::parse_list(&line)?
    } else {
        args.selection()?
    };

    if selection == CaseSelection::Strategic {
        println!("\n{}", render::strategic_overview());
    }

    let selected = selection.resolve(cases);
    if selected.is_empty() {
        bail!("none of the requested cases exist in the dataset");
    }
    println!(
        "Cases to analyze: {:?}",
        selected.iter().map(|c| c.id).collect::<Vec<_>>()
    );
    Ok(selected)
}

fn chat_client(config: &JuryConfig) -> Result<OpenAiChat> {
    let api_key = config.require_api_key()?;
    OpenAiChat::new(&config.base_url, api_key, config.timeout).context("building HTTP client")
}

/// Report failed cases; an error only when nothing succeeded.
fn finish<T>(report: &BatchReport<T>, what: &str) -> Result<()> {
    for failure in &report.failures {
        warn!(case_id = failure.case_id, error = %failure.error, "case did not complete");
    }
    if report.all_failed() {
        bail!("all {} {what} runs failed", report.attempted());
    }
    if !report.failures.is_empty() {
        println!(
            "\n{} of {} cases failed; see log for details.",
            report.failures.len(),
            report.attempted()
        );
    }
    Ok(())
}

async fn run_debate(
    config: &JuryConfig,
    args: &SelectionArgs,
    rounds: Option<u32>,
    output: &Path,
) -> Result<()> {
    let chat = chat_client(config)?;
    let cases = read_cases(config, None)?;
    let selected = choose_cases(&cases, args).await?;
    println!("Using model: {}", config.tribunal_model);

    let runner = TribunalRunner::new(&chat, &config.tribunal_model, config.temperature);
    let report = runner
        .run_cases(&selected, rounds, |case, result| {
            if let Some(strategic) = strategic_case(case.id) {
                println!("\nStrategic rationale: {}", strategic.rationale);
            }
            println!("{}", render::tribunal_report(result));
            if let Some(strategic) = strategic_case(case.id) {
                println!("\n{}", strategic.check(result.final_verdict));
            }
        })
        .await;

    export_debates(output, &report.completed)?;
    println!("{}", render::tribunal_summary(&report.completed));
    finish(&report, "tribunal")
}

async fn run_panel(config: &JuryConfig, args: &SelectionArgs, output: &Path) -> Result<()> {
    let chat = chat_client(config)?;
    let cases = read_cases(config, None)?;
    let selected = choose_cases(&cases, args).await?;
    println!("Model: {}", config.panel_model);

    let runner = PanelRunner::new(&chat, &config.panel_model, config.temperature);
    let report = runner
        .run_cases(&selected, |transcript| {
            let rounds = &transcript.rounds;
            println!(
                "\n{}",
                render::banner(&format!("CASE {}: FACT VERIFICATION TRIBUNAL", transcript.case_id), '=')
            );
            println!("CLAIM:\n  \"{}\"\nTRUTH:\n  \"{}\"", transcript.claim, transcript.truth);
            println!("\n{}", render::banner("ROUND 1: INITIAL STANCES", '-'));
            for stance in &rounds.round1_initial_stances {
                println!("{}", render::stance_block(stance));
            }
            println!("\n{}", render::banner("ROUND 2: CROSS-EXAMINATION", '-'));
            for exchange in &rounds.round2_cross_examination {
                println!("{}", render::exchange_line(exchange));
            }
            for update in &rounds.round2_stance_updates {
                println!("{}", render::stance_update_line(update));
            }
            println!("\n{}", render::banner("ROUND 3: CONSENSUS", '-'));
            println!("{}", render::consensus_block(&rounds.round3_consensus));
        })
        .await;

    let bundle = PanelBundle::new(report.completed.clone());
    write_json_pretty(output, &bundle)?;
    println!("{}", render::panel_summary(&bundle.debates));
    finish(&report, "panel")
}

async fn run_baseline(config: &JuryConfig, args: &SelectionArgs, output: &Path) -> Result<()> {
    let chat = chat_client(config)?;
    let cases = read_cases(config, None)?;
    let selected = choose_cases(&cases, args).await?;
    println!("Using model: {}", config.baseline_model);

    let verifier = BaselineVerifier::new(&chat, &config.baseline_model, config.temperature);
    let report = verifier
        .verify_cases(&selected, |result| {
            println!(
                "Case {}: {} {} ({})\n  {}",
                result.case_id,
                result.verdict.marker(),
                result.verdict.as_str().to_uppercase(),
                percent(result.confidence),
                render::truncate(&result.reasoning, 150)
            );
        })
        .await;

    export_baseline(output, &report.completed)?;
    finish(&report, "baseline")
}

async fn run_compare(
    config: &JuryConfig,
    limit: usize,
    rounds: Option<u32>,
    output_dir: &Path,
) -> Result<()> {
    let chat = chat_client(config)?;
    let cases = read_cases(config, Some(limit))?;
    let selected: Vec<&Case> = cases.iter().collect();
    if selected.is_empty() {
        bail!("no cases to compare");
    }

    println!("\n{}", render::banner("RUNNING SINGLE-AGENT BASELINE", '='));
    let verifier = BaselineVerifier::new(&chat, &config.baseline_model, config.temperature);
    let baseline = verifier
        .verify_cases(&selected, |result| {
            println!("  Case {}: {} ({})", result.case_id, result.verdict, percent(result.confidence));
        })
        .await;

    println!("\n{}", render::banner("RUNNING MULTI-AGENT TRIBUNAL", '='));
    let runner = TribunalRunner::new(&chat, &config.tribunal_model, config.temperature);
    let debates = runner
        .run_cases(&selected, rounds, |_, result| {
            println!(
                "  Case {}: {} ({})",
                result.case_id,
                result.final_verdict,
                percent(result.confidence)
            );
        })
        .await;

    export_baseline(&output_dir.join("single_agent_results.json"), &baseline.completed)?;
    export_debates(&output_dir.join("multi_agent_results.json"), &debates.completed)?;

    let comparison = Comparison::build(&baseline.completed, &debates.completed);
    println!("{}", render::comparison_details(&comparison));
    write_text(&output_dir.join("comparison_report.md"), &comparison.to_markdown())?;
    write_json_pretty(&output_dir.join("visualization_data.json"), &comparison)?;

    finish(&baseline, "baseline")?;
    finish(&debates, "tribunal")
}

fn inspect(case: Option<usize>, input: &Path) -> Result<()> {
    let records = load_debate_exports(input)?;

    let Some(case_id) = case else {
        println!("Available cases in {}:", input.display());
        for record in &records {
            println!(
                "  Case {}: {} {}",
                record.case_id,
                record.verdict.marker(),
                render::truncate(&record.claim, 60)
            );
        }
        println!("\nPass --case <id> to view its raw responses.");
        return Ok(());
    };

    let Some(record) = records.iter().find(|r| r.case_id == case_id) else {
        bail!("case {case_id} not found in {}", input.display());
    };
    println!("CLAIM: {}", render::truncate(&record.claim, 80));
    println!("TRUTH: {}", render::truncate(&record.truth, 80));
    for call in &record.debate_transcript {
        println!("{}", render::raw_call_block(record.case_id, call));
    }
    Ok(())
}
