use serde::{Deserialize, Serialize};

use crate::error::BankError;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "text")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub feedback: String,
}

impl Question {
    /// Exact string comparison against the correct answer.
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}

/// A named, ordered question set covering one topic area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl Module {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Question count as stored in results.
    pub fn question_count(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Check the module can be played.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DegenerateModule` for a module without questions
    /// and `BankError::InvalidQuestion` when a question has no options,
    /// duplicate options, or a correct answer that is not among its options.
    pub fn validate(&self) -> Result<(), BankError> {
        if self.questions.is_empty() {
            return Err(BankError::DegenerateModule(self.id.clone()));
        }
        for (index, q) in self.questions.iter().enumerate() {
            let invalid = |message: &str| BankError::InvalidQuestion {
                module: self.id.clone(),
                index,
                message: message.to_string(),
            };
            if q.options.is_empty() {
                return Err(invalid("question has no options"));
            }
            if !q.options.iter().any(|o| o == &q.correct_answer) {
                return Err(invalid("correct answer is not one of the options"));
            }
            for (i, option) in q.options.iter().enumerate() {
                if q.options[..i].contains(option) {
                    return Err(invalid(&format!("duplicate option '{option}'")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> Question {
        Question {
            prompt: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            correct_answer: correct.into(),
            feedback: String::new(),
        }
    }

    fn module(questions: Vec<Question>) -> Module {
        Module {
            id: "math".into(),
            title: "Math".into(),
            description: String::new(),
            questions,
        }
    }

    #[test]
    fn empty_module_is_degenerate() {
        let err = module(vec![]).validate().unwrap_err();
        assert!(matches!(err, BankError::DegenerateModule(id) if id == "math"));
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let err = module(vec![question("5")]).validate().unwrap_err();
        assert!(matches!(err, BankError::InvalidQuestion { index: 0, .. }));
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let mut q = question("4");
        q.options.push("4".into());
        assert!(module(vec![q]).validate().is_err());
    }

    #[test]
    fn comparison_is_exact() {
        let q = question("4");
        assert!(q.is_correct("4"));
        assert!(!q.is_correct("4 "));
        assert!(!q.is_correct("four"));
    }
}
