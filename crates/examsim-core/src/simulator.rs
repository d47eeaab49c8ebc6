//! The full exam simulation: screens, intents, and the module sequence.
//!
//! [`QuizSimulator`] owns one session engine and one aggregator. The
//! presentation layer forwards every user action as an [`Intent`] and renders
//! from the returned events and from [`QuizSimulator::snapshot`].

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateReport, Aggregator, FinalView, ModuleResult};
use crate::bank::QuestionBank;
use crate::error::{QuizError, SessionError};
use crate::events::Event;
use crate::grading::{self, Grade};
use crate::session::{SessionEngine, SessionPhase, SessionSnapshot, SessionStats, Timing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Home,
    Quiz,
    Results,
    Certificate,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Quiz => "quiz",
            Screen::Results => "results",
            Screen::Certificate => "certificate",
        }
    }
}

/// User actions forwarded by the presentation layer, plus clock ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    StartModule { module_id: String },
    SelectOption { option: String },
    JumpToQuestion { index: usize },
    SkipFeedback,
    ReturnHome,
    GoToNextModule,
    ViewCertificate,
    /// Clear every recorded result to re-run the whole sequence.
    ResetProgress,
    Tick {
        #[serde(default = "default_ticks")]
        ticks: u32,
    },
}

fn default_ticks() -> u32 {
    1
}

/// What the results screen shows for the module just finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub module_id: String,
    pub title: String,
    pub result: ModuleResult,
    pub grade: Grade,
    pub has_next_module: bool,
    pub can_view_certificate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatorSnapshot {
    pub screen: Screen,
    pub session: SessionSnapshot,
    pub completed_module_ids: Vec<String>,
    pub is_sequence_complete: bool,
}

#[derive(Debug, Clone)]
pub struct QuizSimulator {
    bank: QuestionBank,
    engine: SessionEngine,
    aggregator: Aggregator,
    screen: Screen,
}

impl QuizSimulator {
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_timing(bank, Timing::default())
    }

    pub fn with_timing(bank: QuestionBank, timing: Timing) -> Self {
        Self {
            bank,
            engine: SessionEngine::new(timing),
            aggregator: Aggregator::new(),
            screen: Screen::Home,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn is_sequence_complete(&self) -> bool {
        self.aggregator.is_sequence_complete(self.bank.sequence())
    }

    pub fn snapshot(&self) -> SimulatorSnapshot {
        SimulatorSnapshot {
            screen: self.screen,
            session: self.engine.snapshot(),
            completed_module_ids: self
                .aggregator
                .completed_module_ids()
                .map(str::to_string)
                .collect(),
            is_sequence_complete: self.is_sequence_complete(),
        }
    }

    /// The results screen for the last finished module.
    pub fn results_view(&self) -> Option<ResultsView> {
        if self.screen != Screen::Results || self.engine.phase() != SessionPhase::Finished {
            return None;
        }
        let module = self.engine.module()?;
        let result = *self.aggregator.result(&module.id)?;
        let grade = result.grade().ok()?;
        let has_next_module = self.bank.next_in_sequence(&module.id).is_some();
        Some(ResultsView {
            module_id: module.id.clone(),
            title: module.title.clone(),
            result,
            grade,
            has_next_module,
            can_view_certificate: !has_next_module && self.is_sequence_complete(),
        })
    }

    /// The aggregate over the configured sequence.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Grade` if the sequence holds no questions.
    pub fn final_report(&self) -> Result<AggregateReport, QuizError> {
        Ok(self.aggregator.compute_aggregate(self.bank.sequence_modules())?)
    }

    /// # Errors
    ///
    /// Returns `QuizError::SequenceIncomplete` until every module is done.
    pub fn final_view(&self) -> Result<FinalView, QuizError> {
        self.final_report()?
            .final_view()
            .ok_or(QuizError::SequenceIncomplete)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one intent. On error nothing has changed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the intent does not apply to the current
    /// screen or session state.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Vec<Event>, QuizError> {
        let result = self.apply(intent);
        if let Err(e) = &result {
            tracing::warn!(error = %e, screen = self.screen.as_str(), "intent rejected");
        }
        result
    }

    fn apply(&mut self, intent: Intent) -> Result<Vec<Event>, QuizError> {
        match intent {
            Intent::StartModule { module_id } => self.start_module(&module_id),
            Intent::SelectOption { option } => {
                self.require_screen(Screen::Quiz, "select an option")?;
                Ok(vec![self.engine.select_option(&option)?])
            }
            Intent::JumpToQuestion { index } => {
                self.require_screen(Screen::Quiz, "jump to a question")?;
                Ok(vec![self.engine.jump_to(index)?])
            }
            Intent::SkipFeedback => {
                self.require_screen(Screen::Quiz, "skip feedback")?;
                let event = self.engine.advance()?;
                let mut events = vec![event];
                self.collect_result(&mut events);
                Ok(events)
            }
            Intent::ReturnHome => Ok(self.return_home()),
            Intent::GoToNextModule => self.go_to_next_module(),
            Intent::ViewCertificate => self.view_certificate(),
            Intent::ResetProgress => Ok(self.reset_progress()),
            Intent::Tick { ticks } => Ok(self.tick(ticks)),
        }
    }

    /// Advance the clock `ticks` times.
    pub fn tick(&mut self, ticks: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            if self.screen != Screen::Quiz {
                break;
            }
            events.extend(self.engine.tick());
            self.collect_result(&mut events);
        }
        events
    }

    fn start_module(&mut self, module_id: &str) -> Result<Vec<Event>, QuizError> {
        let module = self.bank.require(module_id)?.clone();
        if module.is_empty() {
            return Err(SessionError::DegenerateModule(module.id).into());
        }
        let mut events = Vec::new();
        if self.engine.phase().is_in_attempt() {
            events.push(self.engine.abandon()?);
        }
        events.push(self.engine.start(module)?);
        events.push(self.set_screen(Screen::Quiz));
        Ok(events)
    }

    fn return_home(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.engine.phase().is_in_attempt() {
            if let Ok(event) = self.engine.abandon() {
                events.push(event);
            }
        }
        events.push(self.set_screen(Screen::Home));
        events
    }

    fn go_to_next_module(&mut self) -> Result<Vec<Event>, QuizError> {
        self.require_screen(Screen::Results, "go to the next module")?;
        let current = self
            .engine
            .module_id()
            .ok_or(QuizError::NoActiveModule)?;
        match self.bank.next_in_sequence(current) {
            Some(next) => {
                let next_id = next.id.clone();
                self.start_module(&next_id)
            }
            None => self.view_certificate(),
        }
    }

    fn view_certificate(&mut self) -> Result<Vec<Event>, QuizError> {
        self.require_screen(Screen::Results, "view the certificate")?;
        if !self.is_sequence_complete() {
            return Err(QuizError::SequenceIncomplete);
        }
        Ok(vec![self.set_screen(Screen::Certificate)])
    }

    fn reset_progress(&mut self) -> Vec<Event> {
        let mut events = self.return_home();
        self.aggregator.reset();
        tracing::info!("progress reset");
        events.push(Event::ProgressReset { at: Utc::now() });
        events
    }

    /// Record the result once the engine reports the attempt finished.
    fn collect_result(&mut self, events: &mut Vec<Event>) {
        if self.screen != Screen::Quiz || self.engine.phase() != SessionPhase::Finished {
            return;
        }
        let (Some(module), Some(stats)) = (self.engine.module(), self.engine.result()) else {
            return;
        };
        let module_id = module.id.clone();
        let question_count = module.question_count();
        events.push(self.record(&module_id, question_count, stats));
        events.push(self.set_screen(Screen::Results));
    }

    fn record(&mut self, module_id: &str, question_count: u32, stats: SessionStats) -> Event {
        let replaced = self
            .aggregator
            .record_module_result(module_id, question_count, stats);
        let percentage = stats.percentage(question_count).unwrap_or(0);
        Event::ResultRecorded {
            module_id: module_id.to_string(),
            percentage,
            tier: grading::grade(percentage).tier,
            replaced,
            at: Utc::now(),
        }
    }

    fn require_screen(&self, screen: Screen, action: &'static str) -> Result<(), QuizError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(QuizError::WrongScreen {
                action,
                screen: self.screen.as_str(),
            })
        }
    }

    fn set_screen(&mut self, screen: Screen) -> Event {
        tracing::debug!(from = self.screen.as_str(), to = screen.as_str(), "screen changed");
        self.screen = screen;
        Event::ScreenChanged {
            screen,
            at: Utc::now(),
        }
    }
}
