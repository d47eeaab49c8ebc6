//! Integration tests for loading question banks from disk.

use examsim_core::{BankError, QuestionBank};
use indoc::indoc;

const TOML_BANK: &str = indoc! {r#"
    sequence = ["second", "first"]

    [[modules]]
    id = "first"
    title = "First"

    [[modules.questions]]
    prompt = "Pick one"
    options = ["x", "y"]
    correct_answer = "x"
    feedback = "x is right"

    [[modules]]
    id = "second"
    title = "Second"
    description = "Runs first"

    [[modules.questions]]
    text = "Pick another"
    options = ["p", "q", "r"]
    correct_answer = "r"
"#};

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_toml_bank_with_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "bank.toml", TOML_BANK);

    let bank = QuestionBank::load(&path).unwrap();
    assert_eq!(bank.modules().len(), 2);
    assert_eq!(bank.sequence(), ["second".to_string(), "first".to_string()]);
    assert_eq!(bank.next_in_sequence("second").unwrap().id, "first");
    assert!(bank.next_in_sequence("first").is_none());
    assert_eq!(bank.sequence_question_count(), 2);

    let second = bank.module("second").unwrap();
    assert_eq!(second.questions[0].prompt, "Pick another");
    assert_eq!(second.questions[0].feedback, "");
}

#[test]
fn test_load_json_bank_defaults_sequence_to_file_order() {
    let json = indoc! {r#"
        {
          "modules": [
            {
              "id": "only",
              "title": "Only",
              "questions": [
                { "prompt": "Yes?", "options": ["yes", "no"], "correct_answer": "yes" }
              ]
            }
          ]
        }
    "#};
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "bank.json", json);

    let bank = QuestionBank::load(&path).unwrap();
    assert_eq!(bank.sequence(), ["only".to_string()]);
}

#[test]
fn test_rejects_answer_missing_from_options() {
    let broken = TOML_BANK.replace(r#"correct_answer = "r""#, r#"correct_answer = "s""#);
    let err = QuestionBank::from_toml_str(&broken).unwrap_err();
    assert!(matches!(
        err,
        BankError::InvalidQuestion { ref module, index: 0, .. } if module == "second"
    ));
}

#[test]
fn test_rejects_sequence_with_unknown_module() {
    let broken = TOML_BANK.replace(r#"["second", "first"]"#, r#"["second", "third"]"#);
    let err = QuestionBank::from_toml_str(&broken).unwrap_err();
    assert!(matches!(err, BankError::UnknownModuleId(ref id) if id == "third"));
}

#[test]
fn test_rejects_unsupported_extension_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "bank.yaml", "modules: []");
    assert!(matches!(
        QuestionBank::load(&path),
        Err(BankError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        QuestionBank::load(&dir.path().join("missing.toml")),
        Err(BankError::Read { .. })
    ));
}

#[test]
fn test_sample_bank_is_valid() {
    let sample = QuestionBank::sample();
    let rebuilt = QuestionBank::new(sample.modules().to_vec(), sample.sequence().to_vec());
    assert!(rebuilt.is_ok());
    assert_eq!(
        sample.sequence(),
        [
            "assessment".to_string(),
            "development".to_string(),
            "strategies".to_string()
        ]
    );
}
