use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Correct,
    Incorrect,
    Skipped,
}

impl QuestionStatus {
    pub fn is_pending(self) -> bool {
        self == QuestionStatus::Pending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Correct => "correct",
            QuestionStatus::Incorrect => "incorrect",
            QuestionStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    status: QuestionStatus,
    chosen_option: Option<String>,
}

/// Per-question outcomes for the active attempt.
///
/// Fixed length for the life of an attempt. Each index resolves at most once;
/// later writes are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    pub fn new(len: usize) -> Self {
        Self {
            entries: vec![
                Entry {
                    status: QuestionStatus::Pending,
                    chosen_option: None,
                };
                len
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self, index: usize) -> Option<QuestionStatus> {
        self.entries.get(index).map(|e| e.status)
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.status(index).is_some_and(QuestionStatus::is_pending)
    }

    /// The option picked when `index` was answered. `None` for pending and
    /// skipped questions.
    pub fn chosen_option(&self, index: usize) -> Option<&str> {
        self.entries.get(index)?.chosen_option.as_deref()
    }

    /// Resolve `index` to a terminal status. First writer wins: returns false
    /// and changes nothing if the index is out of range, already resolved, or
    /// `status` is `Pending`.
    pub fn resolve(
        &mut self,
        index: usize,
        status: QuestionStatus,
        chosen_option: Option<String>,
    ) -> bool {
        if status.is_pending() {
            return false;
        }
        match self.entries.get_mut(index) {
            Some(entry) if entry.status.is_pending() => {
                entry.status = status;
                entry.chosen_option = chosen_option;
                true
            }
            _ => false,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.status.is_pending()).count()
    }

    pub fn statuses(&self) -> Vec<QuestionStatus> {
        self.entries.iter().map(|e| e.status).collect()
    }

    pub fn first_pending(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.status.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_all_pending() {
        let ledger = Ledger::new(4);
        assert_eq!(ledger.len(), 4);
        assert!(ledger.statuses().iter().all(|s| s.is_pending()));
        assert_eq!(ledger.resolved_count(), 0);
        assert_eq!(ledger.first_pending(), Some(0));
    }

    #[test]
    fn second_resolution_is_rejected() {
        let mut ledger = Ledger::new(2);
        assert!(ledger.resolve(0, QuestionStatus::Correct, Some("a".into())));
        assert!(!ledger.resolve(0, QuestionStatus::Skipped, None));
        assert_eq!(ledger.status(0), Some(QuestionStatus::Correct));
        assert_eq!(ledger.chosen_option(0), Some("a"));
    }

    #[test]
    fn pending_and_out_of_range_writes_are_ignored() {
        let mut ledger = Ledger::new(1);
        assert!(!ledger.resolve(0, QuestionStatus::Pending, None));
        assert!(!ledger.resolve(3, QuestionStatus::Correct, None));
        assert_eq!(ledger.resolved_count(), 0);
    }

    fn terminal() -> impl Strategy<Value = QuestionStatus> {
        prop_oneof![
            Just(QuestionStatus::Correct),
            Just(QuestionStatus::Incorrect),
            Just(QuestionStatus::Skipped),
        ]
    }

    proptest! {
        #[test]
        fn each_index_keeps_its_first_outcome(
            writes in prop::collection::vec((0usize..6, terminal()), 0..40)
        ) {
            let mut ledger = Ledger::new(6);
            let mut first = [None; 6];
            for (index, status) in writes {
                let accepted = ledger.resolve(index, status, None);
                prop_assert_eq!(accepted, first[index].is_none());
                if first[index].is_none() {
                    first[index] = Some(status);
                }
            }
            for (index, expected) in first.iter().enumerate() {
                prop_assert_eq!(
                    ledger.status(index),
                    Some(expected.unwrap_or(QuestionStatus::Pending))
                );
            }
            prop_assert_eq!(
                ledger.resolved_count(),
                first.iter().filter(|s| s.is_some()).count()
            );
        }
    }
}
