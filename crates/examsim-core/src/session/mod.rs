mod engine;
mod ledger;
mod stats;

pub use engine::{
    QuestionView, SessionEngine, SessionPhase, SessionSnapshot, Timing, DEFAULT_FEEDBACK_TICKS,
    DEFAULT_QUESTION_TICKS,
};
pub use ledger::{Ledger, QuestionStatus};
pub use stats::SessionStats;
