//! Core error types for examsim-core.
//!
//! Every error here is local and recoverable: the component that returns it
//! leaves its state exactly as it was before the rejected call.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for examsim-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session engine rejected an intent
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Question bank failed to load or validate
    #[error("Question bank error: {0}")]
    Bank(#[from] BankError),

    /// Grading could not be computed
    #[error("Grading error: {0}")]
    Grade(#[from] GradeError),

    /// Simulator-level rejection
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted by the session engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Intent issued in a state that forbids it
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Navigation to a question index that does not exist
    #[error("question index {index} out of range (module has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Module without questions
    #[error("module '{0}' has no questions")]
    DegenerateModule(String),
}

/// Errors emitted while loading or validating a question bank.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("unknown module id: {0}")]
    UnknownModuleId(String),

    #[error("module '{0}' has no questions")]
    DegenerateModule(String),

    #[error("duplicate module id: {0}")]
    DuplicateModule(String),

    #[error("invalid question {index} in module '{module}': {message}")]
    InvalidQuestion {
        module: String,
        index: usize,
        message: String,
    },

    #[error("question bank has no modules")]
    Empty,

    #[error("module sequence is empty")]
    EmptySequence,

    #[error("module '{0}' appears more than once in the sequence")]
    DuplicateSequenceEntry(String),

    #[error("unsupported bank format for {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read bank at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML bank: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON bank: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted by the grader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    /// Percentage requested over zero questions
    #[error("cannot grade over zero questions")]
    DegenerateModule,
}

/// Errors emitted by the quiz simulator when dispatching intents.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    Grade(#[from] GradeError),

    #[error("module sequence is not complete yet")]
    SequenceIncomplete,

    #[error("no module attempt is active")]
    NoActiveModule,

    #[error("cannot {action} from the {screen} screen")]
    WrongScreen {
        action: &'static str,
        screen: &'static str,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be resolved or created
    #[error("Configuration directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
