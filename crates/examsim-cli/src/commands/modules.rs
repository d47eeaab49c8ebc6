use std::path::PathBuf;

use clap::Args;
use examsim_core::Config;
use serde::Serialize;

#[derive(Args)]
pub struct ModulesArgs {
    /// Question bank file (TOML or JSON)
    #[arg(long)]
    bank: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ModuleRow<'a> {
    position: Option<usize>,
    id: &'a str,
    title: &'a str,
    questions: usize,
}

pub fn run(args: ModulesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let bank = super::load_bank(args.bank, &config)?;

    let rows: Vec<ModuleRow> = bank
        .modules()
        .iter()
        .map(|m| ModuleRow {
            position: bank.sequence_position(&m.id).map(|p| p + 1),
            id: &m.id,
            title: &m.title,
            questions: m.len(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in rows {
        let position = row
            .position
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        println!(
            "{position:>2}  {:<16} {:>3} questions  {}",
            row.id, row.questions, row.title
        );
    }
    Ok(())
}
