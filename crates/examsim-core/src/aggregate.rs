//! Cross-module results and the final exam verdict.
//!
//! The aggregate divides by the question count of *every* module in the
//! sequence, finished or not, so its percentage is only final once
//! [`Aggregator::is_sequence_complete`] holds. Reports carry `is_complete`
//! for that reason.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bank::Module;
use crate::error::GradeError;
use crate::grading::{self, Grade, Tier, REMEDIATION_THRESHOLD};
use crate::session::SessionStats;

/// Finalised stats of one module attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleResult {
    pub question_count: u32,
    pub stats: SessionStats,
}

impl ModuleResult {
    /// # Errors
    ///
    /// Returns `GradeError::DegenerateModule` if `question_count` is zero.
    pub fn percentage(&self) -> Result<u8, GradeError> {
        self.stats.percentage(self.question_count)
    }

    /// # Errors
    ///
    /// Returns `GradeError::DegenerateModule` if `question_count` is zero.
    pub fn grade(&self) -> Result<Grade, GradeError> {
        self.stats.grade(self.question_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalView {
    Certificate,
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleBreakdown {
    pub module_id: String,
    pub title: String,
    pub question_count: u32,
    pub result: Option<ModuleResult>,
    pub percentage: Option<u8>,
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub total_correct: u32,
    pub total_questions: u32,
    pub total_elapsed_secs: u64,
    pub grade: Grade,
    pub is_complete: bool,
    pub is_certificate_eligible: bool,
    pub modules: Vec<ModuleBreakdown>,
    /// Modules scored below the remediation threshold, or not attempted.
    pub remediation: Vec<String>,
}

impl AggregateReport {
    pub fn percentage(&self) -> u8 {
        self.grade.percentage
    }

    /// Which end-of-exam view applies. `None` until every module is done.
    pub fn final_view(&self) -> Option<FinalView> {
        if !self.is_complete {
            return None;
        }
        Some(if self.is_certificate_eligible {
            FinalView::Certificate
        } else {
            FinalView::Report
        })
    }
}

/// Stores one result per module id. A retry overwrites the earlier result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregator {
    results: BTreeMap<String, ModuleResult>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result for `module_id`, replacing any earlier one.
    /// Returns true when a previous result was replaced.
    pub fn record_module_result(
        &mut self,
        module_id: &str,
        question_count: u32,
        stats: SessionStats,
    ) -> bool {
        let replaced = self
            .results
            .insert(
                module_id.to_string(),
                ModuleResult {
                    question_count,
                    stats,
                },
            )
            .is_some();
        tracing::info!(
            module = module_id,
            replaced,
            correct = stats.correct,
            "module result recorded"
        );
        replaced
    }

    pub fn result(&self, module_id: &str) -> Option<&ModuleResult> {
        self.results.get(module_id)
    }

    pub fn completed_module_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.results.keys().map(String::as_str)
    }

    pub fn is_completed(&self, module_id: &str) -> bool {
        self.results.contains_key(module_id)
    }

    pub fn is_sequence_complete<S: AsRef<str>>(&self, sequence: &[S]) -> bool {
        sequence.iter().all(|id| self.is_completed(id.as_ref()))
    }

    /// Combine the results of `sequence` into one graded report.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::DegenerateModule` if the sequence holds no
    /// questions at all.
    pub fn compute_aggregate<'a>(
        &self,
        sequence: impl IntoIterator<Item = &'a Module>,
    ) -> Result<AggregateReport, GradeError> {
        let mut total_correct = 0_u32;
        let mut total_questions = 0_u32;
        let mut total_elapsed_secs = 0_u64;
        let mut is_complete = true;
        let mut modules = Vec::new();
        let mut remediation = Vec::new();

        for module in sequence {
            let question_count = module.question_count();
            total_questions = total_questions.saturating_add(question_count);

            let result = self.results.get(&module.id).copied();
            let percentage = match result {
                Some(r) => {
                    total_correct = total_correct.saturating_add(r.stats.correct);
                    total_elapsed_secs =
                        total_elapsed_secs.saturating_add(r.stats.total_elapsed_secs);
                    Some(grading::percentage(r.stats.correct, question_count)?)
                }
                None => {
                    is_complete = false;
                    None
                }
            };
            if percentage.map_or(true, |p| p < REMEDIATION_THRESHOLD) {
                remediation.push(module.id.clone());
            }
            modules.push(ModuleBreakdown {
                module_id: module.id.clone(),
                title: module.title.clone(),
                question_count,
                result,
                percentage,
                tier: percentage.map(|p| grading::grade(p).tier),
            });
        }

        let grade = grading::grade(grading::percentage(total_correct, total_questions)?);
        Ok(AggregateReport {
            total_correct,
            total_questions,
            total_elapsed_secs,
            is_certificate_eligible: is_complete
                && grading::is_certificate_eligible(grade.percentage),
            grade,
            is_complete,
            modules,
            remediation,
        })
    }

    /// Forget every result, for a full re-run of the sequence.
    pub fn reset(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Question;
    use proptest::prelude::*;

    fn module(id: &str, n: usize) -> Module {
        Module {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            questions: (0..n)
                .map(|i| Question {
                    prompt: format!("{id}{i}"),
                    options: vec!["a".into(), "b".into()],
                    correct_answer: "a".into(),
                    feedback: String::new(),
                })
                .collect(),
        }
    }

    fn stats(correct: u32, incorrect: u32, skipped: u32) -> SessionStats {
        SessionStats {
            correct,
            incorrect,
            skipped,
            total_elapsed_secs: 30,
        }
    }

    fn three() -> Vec<Module> {
        vec![module("a", 20), module("b", 20), module("c", 20)]
    }

    #[test]
    fn perfect_run_earns_certificate() {
        let modules = three();
        let mut agg = Aggregator::new();
        for m in &modules {
            agg.record_module_result(&m.id, 20, stats(20, 0, 0));
        }

        let report = agg.compute_aggregate(&modules).unwrap();
        assert_eq!(report.percentage(), 100);
        assert_eq!(report.grade.tier, Tier::Expert);
        assert!(report.is_certificate_eligible);
        assert_eq!(report.final_view(), Some(FinalView::Certificate));
        assert!(report.remediation.is_empty());
        assert_eq!(report.total_elapsed_secs, 90);
    }

    #[test]
    fn sixty_percent_gets_report() {
        let modules = three();
        let mut agg = Aggregator::new();
        agg.record_module_result("a", 20, stats(16, 4, 0));
        agg.record_module_result("b", 20, stats(12, 6, 2));
        agg.record_module_result("c", 20, stats(8, 10, 2));

        assert!(agg.is_sequence_complete(&["a", "b", "c"]));
        let report = agg.compute_aggregate(&modules).unwrap();
        assert_eq!(report.percentage(), 60);
        assert!(report.grade.is_passing);
        assert!(!report.is_certificate_eligible);
        assert_eq!(report.final_view(), Some(FinalView::Report));
        assert_eq!(report.remediation, vec!["c".to_string()]);
    }

    #[test]
    fn incomplete_sequence_divides_by_full_denominator() {
        let modules = three();
        let mut agg = Aggregator::new();
        agg.record_module_result("a", 20, stats(20, 0, 0));

        let report = agg.compute_aggregate(&modules).unwrap();
        assert!(!report.is_complete);
        assert_eq!(report.total_questions, 60);
        assert_eq!(report.percentage(), 33);
        assert_eq!(report.final_view(), None);
        assert!(!report.is_certificate_eligible);
        assert_eq!(report.remediation, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn retry_overwrites_instead_of_adding() {
        let modules = three();
        let mut agg = Aggregator::new();
        assert!(!agg.record_module_result("a", 20, stats(5, 15, 0)));
        assert!(agg.record_module_result("a", 20, stats(18, 2, 0)));

        let report = agg.compute_aggregate(&modules).unwrap();
        assert_eq!(report.total_correct, 18);
        assert_eq!(agg.completed_module_ids().count(), 1);
    }

    #[test]
    fn zero_question_sequence_fails_fast() {
        let agg = Aggregator::new();
        let err = agg.compute_aggregate(&Vec::<Module>::new()).unwrap_err();
        assert_eq!(err, GradeError::DegenerateModule);
    }

    #[test]
    fn reset_clears_progress() {
        let mut agg = Aggregator::new();
        agg.record_module_result("a", 20, stats(20, 0, 0));
        agg.reset();
        assert!(!agg.is_completed("a"));
        assert!(!agg.is_sequence_complete(&["a"]));
    }

    proptest! {
        #[test]
        fn recording_twice_equals_recording_once(
            correct in 0u32..=20,
            incorrect in 0u32..=20,
            which in 0usize..3,
        ) {
            let modules = three();
            let id = &modules[which].id;
            let s = stats(correct, incorrect.min(20 - correct), 0);

            let mut once = Aggregator::new();
            once.record_module_result(id, 20, s);
            let mut twice = once.clone();
            twice.record_module_result(id, 20, s);

            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(
                once.compute_aggregate(&modules).unwrap(),
                twice.compute_aggregate(&modules).unwrap()
            );
        }
    }
}
