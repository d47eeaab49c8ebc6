use std::path::PathBuf;

use clap::Subcommand;
use examsim_core::QuestionBank;

#[derive(Subcommand)]
pub enum BankAction {
    /// Check that a bank file loads and passes validation
    Validate {
        /// TOML or JSON bank file
        path: PathBuf,
    },
    /// Print the built-in sample bank as JSON
    Sample,
}

pub fn run(action: BankAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BankAction::Validate { path } => {
            let bank = QuestionBank::load(&path)?;
            println!(
                "ok: {} modules, {} questions in sequence",
                bank.modules().len(),
                bank.sequence_question_count()
            );
        }
        BankAction::Sample => {
            println!("{}", serde_json::to_string_pretty(&QuestionBank::sample())?);
        }
    }
    Ok(())
}
