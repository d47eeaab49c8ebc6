//! Static question bank.
//!
//! The bank is loaded once (TOML, JSON, or the built-in sample), validated,
//! and never mutated afterwards. It also carries the module sequence that
//! makes up the full exam simulation.

mod module;
mod sample;

pub use module::{Module, Question};

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BankError;

/// On-disk shape of a bank file.
#[derive(Debug, Deserialize)]
struct BankFile {
    /// Defaults to every module in file order.
    #[serde(default)]
    sequence: Option<Vec<String>>,
    modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    modules: Vec<Module>,
    sequence: Vec<String>,
}

impl QuestionBank {
    /// Build and validate a bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if there are no modules, a module id repeats, a
    /// module fails [`Module::validate`], or the sequence is empty, repeats
    /// an id, or names a module that does not exist.
    pub fn new(modules: Vec<Module>, sequence: Vec<String>) -> Result<Self, BankError> {
        if modules.is_empty() {
            return Err(BankError::Empty);
        }
        let mut seen = HashSet::new();
        for m in &modules {
            if !seen.insert(m.id.as_str()) {
                return Err(BankError::DuplicateModule(m.id.clone()));
            }
            m.validate()?;
        }
        if sequence.is_empty() {
            return Err(BankError::EmptySequence);
        }
        let mut sequenced = HashSet::new();
        for id in &sequence {
            if !seen.contains(id.as_str()) {
                return Err(BankError::UnknownModuleId(id.clone()));
            }
            if !sequenced.insert(id.as_str()) {
                return Err(BankError::DuplicateSequenceEntry(id.clone()));
            }
        }
        Ok(Self { modules, sequence })
    }

    /// Build a bank whose sequence is every module in order.
    ///
    /// # Errors
    ///
    /// Same as [`QuestionBank::new`].
    pub fn from_modules(modules: Vec<Module>) -> Result<Self, BankError> {
        let sequence = modules.iter().map(|m| m.id.clone()).collect();
        Self::new(modules, sequence)
    }

    /// # Errors
    ///
    /// Returns `BankError::Toml` on malformed input, or any validation error.
    pub fn from_toml_str(content: &str) -> Result<Self, BankError> {
        let file: BankFile = toml::from_str(content)?;
        Self::from_file(file)
    }

    /// # Errors
    ///
    /// Returns `BankError::Json` on malformed input, or any validation error.
    pub fn from_json_str(content: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    /// Load a bank from a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Read` if the file cannot be read,
    /// `BankError::UnsupportedFormat` for any other extension, or a
    /// parse/validation error.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path).map_err(|source| BankError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(BankError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        tracing::debug!(
            path = %path.display(),
            modules = bank.modules.len(),
            "loaded question bank"
        );
        Ok(bank)
    }

    /// The built-in three-module bank.
    pub fn sample() -> Self {
        sample::sample_bank()
    }

    fn from_file(file: BankFile) -> Result<Self, BankError> {
        match file.sequence {
            Some(sequence) => Self::new(file.modules, sequence),
            None => Self::from_modules(file.modules),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// # Errors
    ///
    /// Returns `BankError::UnknownModuleId` if no module has this id.
    pub fn require(&self, id: &str) -> Result<&Module, BankError> {
        self.module(id)
            .ok_or_else(|| BankError::UnknownModuleId(id.to_string()))
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    /// The modules of the sequence, in sequence order.
    pub fn sequence_modules(&self) -> impl Iterator<Item = &Module> + '_ {
        self.sequence.iter().filter_map(|id| self.module(id))
    }

    /// The module that follows `id` in the sequence.
    pub fn next_in_sequence(&self, id: &str) -> Option<&Module> {
        let pos = self.sequence.iter().position(|s| s == id)?;
        self.sequence.get(pos + 1).and_then(|next| self.module(next))
    }

    pub fn sequence_position(&self, id: &str) -> Option<usize> {
        self.sequence.iter().position(|s| s == id)
    }

    /// Questions across the whole sequence.
    pub fn sequence_question_count(&self) -> u32 {
        self.sequence_modules().map(Module::question_count).sum()
    }
}
