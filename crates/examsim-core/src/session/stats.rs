use serde::{Deserialize, Serialize};

use super::ledger::QuestionStatus;
use crate::error::GradeError;
use crate::grading::{self, Grade};

/// Counters for one module attempt. Only ever grow within an attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
    pub total_elapsed_secs: u64,
}

impl SessionStats {
    pub(super) fn record(&mut self, status: QuestionStatus) {
        match status {
            QuestionStatus::Correct => self.correct = self.correct.saturating_add(1),
            QuestionStatus::Incorrect => self.incorrect = self.incorrect.saturating_add(1),
            QuestionStatus::Skipped => self.skipped = self.skipped.saturating_add(1),
            QuestionStatus::Pending => {}
        }
    }

    /// Questions that reached a terminal status.
    pub fn resolved(&self) -> u32 {
        self.correct + self.incorrect + self.skipped
    }

    /// # Errors
    ///
    /// Returns `GradeError::DegenerateModule` if `total_questions` is zero.
    pub fn percentage(&self, total_questions: u32) -> Result<u8, GradeError> {
        grading::percentage(self.correct, total_questions)
    }

    /// # Errors
    ///
    /// Returns `GradeError::DegenerateModule` if `total_questions` is zero.
    pub fn grade(&self, total_questions: u32) -> Result<Grade, GradeError> {
        self.percentage(total_questions).map(grading::grade)
    }

    /// `mm:ss` of the elapsed time.
    pub fn elapsed_display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.total_elapsed_secs / 60,
            self.total_elapsed_secs % 60
        )
    }
}
