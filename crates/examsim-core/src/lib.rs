//! # Examsim Core Library
//!
//! This library provides the core logic for a timed, multi-module quiz
//! simulator. Every operation is available through the standalone `examsim`
//! CLI, which is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Clock**: Tick-driven countdown and elapsed timers. The caller invokes
//!   `tick()` and receives events instead of callbacks
//! - **Session Engine**: One attempt at one module, with per-question
//!   countdowns, timed feedback and first-writer-wins answer recording
//! - **Grader / Aggregator**: Percentages, tiers and the cross-module verdict
//! - **Simulator**: Screen flow (home, quiz, results, certificate) driven by
//!   serializable intents
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`QuizSimulator`]: Top-level state machine for a full exam run
//! - [`SessionEngine`]: Single-module attempt state machine
//! - [`QuestionBank`]: Validated, read-only module catalogue
//! - [`Config`]: Application configuration management

pub mod aggregate;
pub mod bank;
pub mod clock;
pub mod error;
pub mod events;
pub mod grading;
pub mod session;
pub mod simulator;
pub mod storage;

pub use aggregate::{AggregateReport, Aggregator, FinalView, ModuleBreakdown, ModuleResult};
pub use bank::{Module, Question, QuestionBank};
pub use clock::{Clock, ClockEvent, TimerHandle, TimerKind};
pub use error::{BankError, ConfigError, CoreError, GradeError, QuizError, SessionError};
pub use events::Event;
pub use grading::{grade, Grade, Tier};
pub use session::{
    QuestionStatus, SessionEngine, SessionPhase, SessionSnapshot, SessionStats, Timing,
};
pub use simulator::{Intent, QuizSimulator, ResultsView, Screen, SimulatorSnapshot};
pub use storage::Config;
