//! Interactive exam session on the terminal.
//!
//! Ticks come from a tokio interval and stdin lines are parsed into intents;
//! both feed the same simulator from one `select!` loop.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use examsim_core::{
    Config, Event, FinalView, Intent, QuestionStatus, QuizSimulator, Screen, TimerKind,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[derive(Args)]
pub struct PlayArgs {
    /// Module to start with (defaults to the first in the sequence)
    #[arg(long)]
    module: Option<String>,
    /// Question bank file (TOML or JSON)
    #[arg(long)]
    bank: Option<PathBuf>,
}

enum Input {
    Intent(Intent),
    Status,
    Help,
    Quit,
    Unknown,
}

const HELP: &str = "\
commands:
  <n>        choose option n
  j <n>      jump to question n
  n          skip feedback
  next       go to the next module
  home       return to the home screen
  start <id> start a module
  cert       view the certificate
  reset      clear all results
  s          show status
  q          quit";

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let bank = super::load_bank(args.bank, &config)?;
    let module_id = match args.module {
        Some(id) => id,
        None => bank
            .sequence()
            .first()
            .cloned()
            .ok_or("question bank has an empty sequence")?,
    };
    let period = Duration::from_millis(config.timing.tick_millis.max(1));
    let mut sim = QuizSimulator::with_timing(bank, config.timing());

    let events = sim.dispatch(Intent::StartModule { module_id })?;
    println!("{HELP}\n");
    render(&sim, &events);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(&mut sim, period))
}

async fn session_loop(
    sim: &mut QuizSimulator,
    period: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = sim.tick(1);
                render(sim, &events);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(sim, &line) {
                    Input::Intent(intent) => match sim.dispatch(intent) {
                        Ok(events) => render(sim, &events),
                        Err(e) => println!("! {e}"),
                    },
                    Input::Status => print_status(sim),
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown => println!("! unrecognised input, type 'h' for help"),
                }
            }
        }
        if sim.screen() == Screen::Certificate {
            break;
        }
    }
    Ok(())
}

fn parse_input(sim: &QuizSimulator, line: &str) -> Input {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Input::Unknown;
    };
    let arg = words.next();
    match (head, arg) {
        ("q" | "quit", _) => Input::Quit,
        ("h" | "help", _) => Input::Help,
        ("s" | "status", _) => Input::Status,
        ("n", None) => Input::Intent(Intent::SkipFeedback),
        ("next", None) => Input::Intent(Intent::GoToNextModule),
        ("home", None) => Input::Intent(Intent::ReturnHome),
        ("cert", None) => Input::Intent(Intent::ViewCertificate),
        ("reset", None) => Input::Intent(Intent::ResetProgress),
        ("start", Some(id)) => Input::Intent(Intent::StartModule {
            module_id: id.to_string(),
        }),
        ("j", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Input::Intent(Intent::JumpToQuestion { index: n - 1 }),
            _ => Input::Unknown,
        },
        (n, None) => {
            let option = n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| sim.engine().current_question()?.options.get(i).cloned());
            match option {
                Some(option) => Input::Intent(Intent::SelectOption { option }),
                None => Input::Unknown,
            }
        }
        _ => Input::Unknown,
    }
}

fn render(sim: &QuizSimulator, events: &[Event]) {
    for event in events {
        match event {
            Event::QuestionEntered {
                index,
                remaining_ticks,
                ..
            } => {
                print_question(sim, *index);
                println!("  [{remaining_ticks}s]");
            }
            Event::QuestionReviewed { index, status, .. } => {
                print_question(sim, *index);
                println!("  already answered: {}", status_label(*status));
            }
            Event::OptionSelected {
                is_correct,
                correct_answer,
                feedback,
                ..
            } => {
                if *is_correct {
                    println!("  correct!");
                } else {
                    println!("  incorrect, the answer is: {correct_answer}");
                }
                print_feedback(feedback);
            }
            Event::QuestionTimedOut {
                correct_answer,
                feedback,
                ..
            } => {
                println!("  time's up, the answer is: {correct_answer}");
                print_feedback(feedback);
            }
            Event::CountdownTicked {
                kind: TimerKind::Question,
                remaining_ticks,
                ..
            } if *remaining_ticks <= 5 || remaining_ticks % 15 == 0 => {
                println!("  [{remaining_ticks}s left]");
            }
            Event::AttemptAbandoned { module_id, .. } => {
                println!("left {module_id}, nothing recorded");
            }
            Event::ResultRecorded { .. } => print_results(sim),
            Event::ProgressReset { .. } => println!("all results cleared"),
            Event::ScreenChanged {
                screen: Screen::Home,
                ..
            } => print_home(sim),
            Event::ScreenChanged {
                screen: Screen::Certificate,
                ..
            } => print_final(sim),
            _ => {}
        }
    }
}

fn print_question(sim: &QuizSimulator, index: usize) {
    let engine = sim.engine();
    let Some(question) = engine.current_question() else {
        return;
    };
    println!(
        "\nQuestion {}/{}: {}",
        index + 1,
        engine.ledger().len(),
        question.prompt
    );
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
}

fn print_feedback(feedback: &str) {
    if !feedback.is_empty() {
        println!("  {feedback}");
    }
}

fn print_status(sim: &QuizSimulator) {
    let snapshot = sim.engine().snapshot();
    let marks: String = snapshot
        .statuses
        .iter()
        .map(|s| match s {
            QuestionStatus::Pending => '.',
            QuestionStatus::Correct => '+',
            QuestionStatus::Incorrect => 'x',
            QuestionStatus::Skipped => '-',
        })
        .collect();
    println!(
        "{} [{marks}] {} correct, {} elapsed",
        snapshot.module_id.as_deref().unwrap_or("-"),
        snapshot.stats.correct,
        snapshot.stats.elapsed_display()
    );
}

fn print_results(sim: &QuizSimulator) {
    let Some(view) = sim.results_view() else {
        return;
    };
    let stats = view.result.stats;
    println!(
        "\n{}: {}% ({}) in {}",
        view.title,
        view.grade.percentage,
        view.grade.tier,
        stats.elapsed_display()
    );
    println!(
        "  {} correct, {} incorrect, {} skipped",
        stats.correct, stats.incorrect, stats.skipped
    );
    println!("  {}", view.grade.advisory);
    if view.has_next_module {
        println!("type 'next' for the next module");
    } else if view.can_view_certificate {
        println!("type 'cert' to see your final result");
    }
}

fn print_home(sim: &QuizSimulator) {
    println!("\nmodules:");
    for module in sim.bank().sequence_modules() {
        let done = if sim.aggregator().is_completed(&module.id) {
            "done"
        } else {
            "    "
        };
        println!("  [{done}] {:<16} {}", module.id, module.title);
    }
    println!("type 'start <id>' to begin");
}

fn print_final(sim: &QuizSimulator) {
    let report = match sim.final_report() {
        Ok(report) => report,
        Err(e) => {
            println!("! {e}");
            return;
        }
    };
    match report.final_view() {
        Some(FinalView::Certificate) => println!(
            "\n*** Certificate of completion: {}% ({}) ***",
            report.percentage(),
            report.grade.tier
        ),
        Some(FinalView::Report) | None => {
            println!(
                "\nFinal report: {}% ({})",
                report.percentage(),
                report.grade.tier
            );
            if !report.remediation.is_empty() {
                println!("  review: {}", report.remediation.join(", "));
            }
        }
    }
}

fn status_label(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::Pending => "not yet",
        QuestionStatus::Correct => "correct",
        QuestionStatus::Incorrect => "incorrect",
        QuestionStatus::Skipped => "timed out",
    }
}
