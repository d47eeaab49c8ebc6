//! Session engine for one module attempt.
//!
//! Like the clock underneath it, the engine has no thread. The caller drives
//! it with `tick()` once per second and forwards user intents as method calls.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Finished --start--> QuestionActive
//! QuestionActive --select_option | timeout--> FeedbackActive
//! FeedbackActive --advance--> QuestionActive | Reviewing | Finished
//! Reviewing --advance--> QuestionActive | Reviewing | Finished
//! any active --jump_to--> QuestionActive | Reviewing
//! any active --finish--> Finished
//! ```
//!
//! At most one of the question and feedback countdowns is alive, and every
//! transition out of a phase cancels the countdown that phase owns before
//! touching any other state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ledger::{Ledger, QuestionStatus};
use super::stats::SessionStats;
use crate::bank::{Module, Question};
use crate::clock::{Clock, ClockEvent, TimerHandle, TimerKind};
use crate::error::SessionError;
use crate::events::Event;

pub const DEFAULT_QUESTION_TICKS: u64 = 60;
pub const DEFAULT_FEEDBACK_TICKS: u64 = 15;

/// Countdown lengths, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub question_ticks: u64,
    pub feedback_ticks: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            question_ticks: DEFAULT_QUESTION_TICKS,
            feedback_ticks: DEFAULT_FEEDBACK_TICKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    QuestionActive,
    FeedbackActive,
    /// Read-only view of an already resolved question.
    Reviewing,
    Finished,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::QuestionActive => "question_active",
            SessionPhase::FeedbackActive => "feedback_active",
            SessionPhase::Reviewing => "reviewing",
            SessionPhase::Finished => "finished",
        }
    }

    /// An attempt is under way and accepts navigation.
    pub fn is_in_attempt(self) -> bool {
        matches!(
            self,
            SessionPhase::QuestionActive | SessionPhase::FeedbackActive | SessionPhase::Reviewing
        )
    }
}

/// The current question as the presentation layer may show it. The answer
/// and feedback are only revealed once the question is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub feedback: Option<String>,
}

/// Read-only copy of the engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub module_id: Option<String>,
    pub current_index: usize,
    pub question_count: usize,
    pub question: Option<QuestionView>,
    pub statuses: Vec<QuestionStatus>,
    pub stats: SessionStats,
    pub is_answered: bool,
    pub selected_option: Option<String>,
    /// Option recorded for the current index when it was answered.
    pub answered_option: Option<String>,
    pub is_feedback_visible: bool,
    pub question_remaining_ticks: Option<u64>,
    pub feedback_remaining_ticks: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SessionEngine {
    timing: Timing,
    clock: Clock,
    module: Option<Module>,
    phase: SessionPhase,
    current_index: usize,
    ledger: Ledger,
    stats: SessionStats,
    selected_option: Option<String>,
    elapsed_timer: Option<TimerHandle>,
    question_timer: Option<TimerHandle>,
    feedback_timer: Option<TimerHandle>,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}

impl SessionEngine {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            clock: Clock::new(),
            module: None,
            phase: SessionPhase::Idle,
            current_index: 0,
            ledger: Ledger::default(),
            stats: SessionStats::default(),
            selected_option: None,
            elapsed_timer: None,
            question_timer: None,
            feedback_timer: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn module(&self) -> Option<&Module> {
        self.module.as_ref()
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module.as_ref().map(|m| m.id.as_str())
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.module.as_ref()?.question(self.current_index)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_answered(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::FeedbackActive | SessionPhase::Reviewing | SessionPhase::Finished
        )
    }

    pub fn is_feedback_visible(&self) -> bool {
        self.phase == SessionPhase::FeedbackActive
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    pub fn question_remaining(&self) -> Option<u64> {
        self.question_timer.and_then(|_| self.clock.remaining(TimerKind::Question))
    }

    pub fn feedback_remaining(&self) -> Option<u64> {
        self.feedback_timer.and_then(|_| self.clock.remaining(TimerKind::Feedback))
    }

    /// Finalised stats, available once the attempt is `Finished`.
    pub fn result(&self) -> Option<SessionStats> {
        (self.phase == SessionPhase::Finished).then_some(self.stats)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let revealed = self.phase != SessionPhase::QuestionActive;
        let question = self.current_question().map(|q| QuestionView {
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            correct_answer: revealed.then(|| q.correct_answer.clone()),
            feedback: revealed.then(|| q.feedback.clone()),
        });
        SessionSnapshot {
            phase: self.phase,
            module_id: self.module_id().map(str::to_string),
            current_index: self.current_index,
            question_count: self.ledger.len(),
            question,
            statuses: self.ledger.statuses(),
            stats: self.stats,
            is_answered: self.is_answered(),
            selected_option: self.selected_option.clone(),
            answered_option: self
                .ledger
                .chosen_option(self.current_index)
                .map(str::to_string),
            is_feedback_visible: self.is_feedback_visible(),
            question_remaining_ticks: self.question_remaining(),
            feedback_remaining_ticks: self.feedback_remaining(),
        }
    }

    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            snapshot: self.snapshot(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh attempt at `module`, tearing down whatever ran before.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DegenerateModule` if the module has no
    /// questions; the engine is left untouched.
    pub fn start(&mut self, module: Module) -> Result<Event, SessionError> {
        if module.is_empty() {
            return Err(SessionError::DegenerateModule(module.id));
        }
        self.teardown();

        let event = Event::AttemptStarted {
            module_id: module.id.clone(),
            question_count: module.len(),
            question_ticks: self.timing.question_ticks,
            at: Utc::now(),
        };
        tracing::info!(module = %module.id, questions = module.len(), "attempt started");

        self.ledger = Ledger::new(module.len());
        self.module = Some(module);
        self.stats = SessionStats::default();
        self.elapsed_timer = Some(self.clock.start_timer(TimerKind::Elapsed, None));
        self.enter(0);
        Ok(event)
    }

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless a question is active
    /// and unanswered.
    pub fn select_option(&mut self, option: &str) -> Result<Event, SessionError> {
        if self.phase != SessionPhase::QuestionActive || !self.ledger.is_pending(self.current_index)
        {
            return Err(self.invalid("select an option"));
        }
        let Some(question) = self.current_question() else {
            return Err(self.invalid("select an option"));
        };
        let is_correct = question.is_correct(option);
        let correct_answer = question.correct_answer.clone();
        let feedback = question.feedback.clone();

        self.cancel_question_timer();
        let status = if is_correct {
            QuestionStatus::Correct
        } else {
            QuestionStatus::Incorrect
        };
        self.ledger
            .resolve(self.current_index, status, Some(option.to_string()));
        self.stats.record(status);
        self.selected_option = Some(option.to_string());
        self.show_feedback();

        tracing::debug!(index = self.current_index, is_correct, "option selected");
        Ok(Event::OptionSelected {
            index: self.current_index,
            option: option.to_string(),
            is_correct,
            correct_answer,
            feedback,
            feedback_ticks: self.timing.feedback_ticks,
            at: Utc::now(),
        })
    }

    /// Mark the current question as skipped because its countdown ran out.
    /// Normally invoked from `tick()`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the question was already
    /// resolved or no question is active; nothing changes in that case.
    pub fn timeout(&mut self) -> Result<Event, SessionError> {
        if self.phase != SessionPhase::QuestionActive || !self.ledger.is_pending(self.current_index)
        {
            return Err(self.invalid("time out"));
        }
        let Some(question) = self.current_question() else {
            return Err(self.invalid("time out"));
        };
        let correct_answer = question.correct_answer.clone();
        let feedback = question.feedback.clone();

        self.cancel_question_timer();
        self.ledger
            .resolve(self.current_index, QuestionStatus::Skipped, None);
        self.stats.record(QuestionStatus::Skipped);
        self.selected_option = None;
        self.show_feedback();

        tracing::debug!(index = self.current_index, "question timed out");
        Ok(Event::QuestionTimedOut {
            index: self.current_index,
            correct_answer,
            feedback,
            feedback_ticks: self.timing.feedback_ticks,
            at: Utc::now(),
        })
    }

    /// Leave feedback (or the read-only review view) for the next question,
    /// finishing the attempt after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `FeedbackActive`
    /// and `Reviewing`.
    pub fn advance(&mut self) -> Result<Event, SessionError> {
        if !matches!(
            self.phase,
            SessionPhase::FeedbackActive | SessionPhase::Reviewing
        ) {
            return Err(self.invalid("advance"));
        }
        self.cancel_feedback_timer();

        let next = self.current_index + 1;
        if next >= self.ledger.len() {
            return Ok(self.finish_attempt());
        }
        Ok(self.enter(next))
    }

    /// Navigate to any question of the attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when no attempt is running
    /// and `SessionError::IndexOutOfRange` for a nonexistent index.
    pub fn jump_to(&mut self, index: usize) -> Result<Event, SessionError> {
        if !self.phase.is_in_attempt() {
            return Err(self.invalid("jump to a question"));
        }
        if index >= self.ledger.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.ledger.len(),
            });
        }
        self.cancel_question_timer();
        self.cancel_feedback_timer();
        Ok(self.enter(index))
    }

    /// Force the attempt to end now. Repeated calls return the same result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if no attempt was started.
    pub fn finish(&mut self) -> Result<Event, SessionError> {
        match self.phase {
            SessionPhase::Idle => Err(self.invalid("finish")),
            SessionPhase::Finished => Ok(Event::AttemptFinished {
                module_id: self.module_id().unwrap_or_default().to_string(),
                stats: self.stats,
                at: Utc::now(),
            }),
            _ => Ok(self.finish_attempt()),
        }
    }

    /// Drop the running attempt without producing a result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` when idle.
    pub fn abandon(&mut self) -> Result<Event, SessionError> {
        if self.phase == SessionPhase::Idle {
            return Err(self.invalid("abandon"));
        }
        let module_id = self.module_id().unwrap_or_default().to_string();
        self.teardown();
        tracing::info!(module = %module_id, "attempt abandoned");
        Ok(Event::AttemptAbandoned {
            module_id,
            at: Utc::now(),
        })
    }

    /// Advance the clock one tick and act on whatever expired.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for clock_event in self.clock.tick() {
            match clock_event {
                ClockEvent::Ticked {
                    handle, remaining, ..
                } => {
                    if Some(handle) == self.elapsed_timer {
                        self.stats.total_elapsed_secs += 1;
                        events.push(Event::ElapsedTicked {
                            total_elapsed_secs: self.stats.total_elapsed_secs,
                            at: Utc::now(),
                        });
                    } else if Some(handle) == self.question_timer
                        || Some(handle) == self.feedback_timer
                    {
                        events.push(Event::CountdownTicked {
                            kind: handle.kind(),
                            remaining_ticks: remaining.unwrap_or(0),
                            at: Utc::now(),
                        });
                    }
                }
                ClockEvent::Expired { handle } => {
                    let outcome = if Some(handle) == self.question_timer {
                        self.question_timer = None;
                        self.timeout()
                    } else if Some(handle) == self.feedback_timer {
                        self.feedback_timer = None;
                        self.advance()
                    } else {
                        continue;
                    };
                    match outcome {
                        Ok(event) => events.push(event),
                        Err(e) => tracing::debug!(error = %e, "stale countdown expiry ignored"),
                    }
                }
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn invalid(&self, action: &'static str) -> SessionError {
        tracing::debug!(action, state = self.phase.as_str(), "intent rejected");
        SessionError::InvalidTransition {
            action,
            state: self.phase.as_str(),
        }
    }

    /// Make `index` current. Countdowns must already be cancelled.
    fn enter(&mut self, index: usize) -> Event {
        self.current_index = index;
        self.selected_option = None;
        match self.ledger.status(index) {
            Some(QuestionStatus::Pending) => {
                self.phase = SessionPhase::QuestionActive;
                self.question_timer = Some(
                    self.clock
                        .start_timer(TimerKind::Question, Some(self.timing.question_ticks)),
                );
                Event::QuestionEntered {
                    index,
                    remaining_ticks: self.timing.question_ticks,
                    at: Utc::now(),
                }
            }
            status => {
                self.phase = SessionPhase::Reviewing;
                Event::QuestionReviewed {
                    index,
                    status: status.unwrap_or(QuestionStatus::Pending),
                    at: Utc::now(),
                }
            }
        }
    }

    fn show_feedback(&mut self) {
        self.phase = SessionPhase::FeedbackActive;
        self.feedback_timer = Some(
            self.clock
                .start_timer(TimerKind::Feedback, Some(self.timing.feedback_ticks)),
        );
    }

    fn finish_attempt(&mut self) -> Event {
        self.clock.cancel_all();
        self.elapsed_timer = None;
        self.question_timer = None;
        self.feedback_timer = None;
        self.phase = SessionPhase::Finished;

        let module_id = self.module_id().unwrap_or_default().to_string();
        tracing::info!(
            module = %module_id,
            correct = self.stats.correct,
            incorrect = self.stats.incorrect,
            skipped = self.stats.skipped,
            elapsed_secs = self.stats.total_elapsed_secs,
            "attempt finished"
        );
        Event::AttemptFinished {
            module_id,
            stats: self.stats,
            at: Utc::now(),
        }
    }

    fn cancel_question_timer(&mut self) {
        if let Some(handle) = self.question_timer.take() {
            self.clock.cancel_timer(handle);
        }
    }

    fn cancel_feedback_timer(&mut self) {
        if let Some(handle) = self.feedback_timer.take() {
            self.clock.cancel_timer(handle);
        }
    }

    /// Release every timer and forget the attempt.
    fn teardown(&mut self) {
        self.clock.cancel_all();
        self.elapsed_timer = None;
        self.question_timer = None;
        self.feedback_timer = None;
        self.module = None;
        self.phase = SessionPhase::Idle;
        self.current_index = 0;
        self.ledger = Ledger::default();
        self.stats = SessionStats::default();
        self.selected_option = None;
    }
}
