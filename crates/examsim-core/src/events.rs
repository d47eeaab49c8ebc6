use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::TimerKind;
use crate::grading::Tier;
use crate::session::{QuestionStatus, SessionSnapshot, SessionStats};
use crate::simulator::Screen;

/// Every state change in the system produces an Event.
/// The presentation layer renders from events and snapshots only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AttemptStarted {
        module_id: String,
        question_count: usize,
        question_ticks: u64,
        at: DateTime<Utc>,
    },
    /// A pending question became current and its countdown started.
    QuestionEntered {
        index: usize,
        remaining_ticks: u64,
        at: DateTime<Utc>,
    },
    /// A resolved question became current in read-only mode.
    QuestionReviewed {
        index: usize,
        status: QuestionStatus,
        at: DateTime<Utc>,
    },
    OptionSelected {
        index: usize,
        option: String,
        is_correct: bool,
        correct_answer: String,
        feedback: String,
        feedback_ticks: u64,
        at: DateTime<Utc>,
    },
    QuestionTimedOut {
        index: usize,
        correct_answer: String,
        feedback: String,
        feedback_ticks: u64,
        at: DateTime<Utc>,
    },
    CountdownTicked {
        kind: TimerKind,
        remaining_ticks: u64,
        at: DateTime<Utc>,
    },
    ElapsedTicked {
        total_elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    AttemptFinished {
        module_id: String,
        stats: SessionStats,
        at: DateTime<Utc>,
    },
    /// Attempt torn down without a result (return home, module switch).
    AttemptAbandoned {
        module_id: String,
        at: DateTime<Utc>,
    },
    ResultRecorded {
        module_id: String,
        percentage: u8,
        tier: Tier,
        replaced: bool,
        at: DateTime<Utc>,
    },
    ProgressReset {
        at: DateTime<Utc>,
    },
    ScreenChanged {
        screen: Screen,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        snapshot: SessionSnapshot,
        at: DateTime<Utc>,
    },
}
