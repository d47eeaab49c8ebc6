//! Deterministic, non-interactive runs from a JSON intent script.

use std::path::PathBuf;

use clap::Args;
use examsim_core::{Config, Event, Intent, QuizSimulator, Timing};
use serde::Serialize;

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON file holding an array of intents
    script: PathBuf,
    /// Question bank file (TOML or JSON)
    #[arg(long)]
    bank: Option<PathBuf>,
    /// Seconds per question (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    question_ticks: Option<u64>,
    /// Seconds of feedback (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    feedback_ticks: Option<u64>,
    /// Stop at the first rejected intent
    #[arg(long)]
    strict: bool,
}

#[derive(Serialize)]
struct Rejection {
    step: usize,
    intent: Intent,
    error: String,
}

#[derive(Serialize)]
struct ReplayOutput {
    events: Vec<Event>,
    rejected: Vec<Rejection>,
    snapshot: examsim_core::SimulatorSnapshot,
    report: Option<examsim_core::AggregateReport>,
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let bank = super::load_bank(args.bank, &config)?;
    let content = std::fs::read_to_string(&args.script)
        .map_err(|e| format!("cannot read {}: {e}", args.script.display()))?;
    let intents: Vec<Intent> = serde_json::from_str(&content)?;

    let defaults = config.timing();
    let timing = Timing {
        question_ticks: args.question_ticks.unwrap_or(defaults.question_ticks),
        feedback_ticks: args.feedback_ticks.unwrap_or(defaults.feedback_ticks),
    };
    let mut sim = QuizSimulator::with_timing(bank, timing);
    tracing::debug!(steps = intents.len(), ?timing, "replaying intent script");

    let mut events = Vec::new();
    let mut rejected = Vec::new();
    for (step, intent) in intents.into_iter().enumerate() {
        match sim.dispatch(intent.clone()) {
            Ok(mut produced) => events.append(&mut produced),
            Err(e) if args.strict => return Err(format!("step {step}: {e}").into()),
            Err(e) => {
                tracing::debug!(step, error = %e, "replay step rejected");
                rejected.push(Rejection {
                    step,
                    intent,
                    error: e.to_string(),
                });
            }
        }
    }

    let output = ReplayOutput {
        events,
        rejected,
        snapshot: sim.snapshot(),
        report: sim.final_report().ok(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
