pub mod bank;
pub mod config;
pub mod grade;
pub mod modules;
pub mod play;
pub mod replay;

use std::path::PathBuf;

use examsim_core::{Config, QuestionBank};

/// Explicit path first, then `bank.path` from config, then the sample bank.
pub fn load_bank(
    explicit: Option<PathBuf>,
    config: &Config,
) -> Result<QuestionBank, Box<dyn std::error::Error>> {
    match explicit.or_else(|| config.bank.path.clone()) {
        Some(path) => Ok(QuestionBank::load(&path)?),
        None => Ok(QuestionBank::sample()),
    }
}
