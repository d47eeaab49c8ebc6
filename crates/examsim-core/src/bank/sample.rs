//! Built-in sample bank for the three-module exam simulation.

use super::{Module, Question, QuestionBank};

fn q(prompt: &str, options: [&str; 4], correct: usize, feedback: &str) -> Question {
    Question {
        prompt: prompt.into(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct_answer: options[correct].to_string(),
        feedback: feedback.into(),
    }
}

pub(super) fn sample_bank() -> QuestionBank {
    let assessment = Module {
        id: "assessment".into(),
        title: "Assessment and Measurement".into(),
        description: "Validity, reliability and the design of fair tests.".into(),
        questions: vec![
            q(
                "A test that measures what it claims to measure is said to have high...",
                ["reliability", "validity", "difficulty", "discrimination"],
                1,
                "Validity is about measuring the intended construct; reliability is about consistency.",
            ),
            q(
                "Giving the same test twice and correlating the scores estimates...",
                [
                    "test-retest reliability",
                    "content validity",
                    "item difficulty",
                    "face validity",
                ],
                0,
                "Test-retest reliability is the stability of scores over time.",
            ),
            q(
                "Which assessment is primarily used to adjust teaching while learning is in progress?",
                ["summative", "norm-referenced", "formative", "placement"],
                2,
                "Formative assessment informs instruction during the learning process.",
            ),
            q(
                "An item answered correctly by almost every student has a difficulty index close to...",
                ["0", "0.25", "0.5", "1"],
                3,
                "The difficulty index is the proportion of correct answers, so an easy item is near 1.",
            ),
        ],
    };

    let development = Module {
        id: "development".into(),
        title: "Learner Development".into(),
        description: "Cognitive and social development theories.".into(),
        questions: vec![
            q(
                "In Piaget's theory, conservation is first mastered in which stage?",
                [
                    "sensorimotor",
                    "preoperational",
                    "concrete operational",
                    "formal operational",
                ],
                2,
                "Conservation emerges in the concrete operational stage, roughly ages 7 to 11.",
            ),
            q(
                "Vygotsky's zone of proximal development describes tasks a learner can do...",
                [
                    "alone without help",
                    "with guidance from a more capable other",
                    "only after formal instruction",
                    "never, regardless of support",
                ],
                1,
                "The ZPD lies between independent performance and performance with support.",
            ),
            q(
                "Temporary support that is withdrawn as competence grows is called...",
                ["scaffolding", "tracking", "streaming", "remediation"],
                0,
                "Scaffolding is faded as the learner becomes independent.",
            ),
            q(
                "Erikson's stage for adolescents centres on...",
                [
                    "trust versus mistrust",
                    "industry versus inferiority",
                    "intimacy versus isolation",
                    "identity versus role confusion",
                ],
                3,
                "Adolescence is the identity versus role confusion stage.",
            ),
        ],
    };

    let strategies = Module {
        id: "strategies".into(),
        title: "Teaching Strategies".into(),
        description: "Instructional methods and classroom practice.".into(),
        questions: vec![
            q(
                "Students working in small groups where each member masters one part and teaches it describes...",
                ["direct instruction", "jigsaw", "drill and practice", "lecture"],
                1,
                "In a jigsaw each student becomes the expert on one piece and teaches the others.",
            ),
            q(
                "Asking questions that require learners to justify and evaluate targets which level of Bloom's taxonomy?",
                ["remember", "understand", "apply", "evaluate"],
                3,
                "Justifying and judging are evaluation-level skills.",
            ),
            q(
                "Waiting a few seconds after posing a question before calling on a student mainly...",
                [
                    "increases the quality of answers",
                    "reduces lesson time",
                    "discourages participation",
                    "replaces assessment",
                ],
                0,
                "Longer wait time leads to fuller answers and more participation.",
            ),
            q(
                "Adjusting content, process or product to learner readiness is called...",
                [
                    "standardisation",
                    "differentiated instruction",
                    "ability grouping only",
                    "rote learning",
                ],
                1,
                "Differentiated instruction adapts content, process and product.",
            ),
        ],
    };

    let modules = vec![assessment, development, strategies];
    let sequence = modules.iter().map(|m| m.id.clone()).collect();
    QuestionBank { modules, sequence }
}
