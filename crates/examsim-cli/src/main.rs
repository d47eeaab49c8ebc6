use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "examsim", version, about = "Timed multi-module exam simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the modules of the question bank
    Modules(commands::modules::ModulesArgs),
    /// Grade a percentage
    Grade {
        /// Score percentage (0-100)
        percentage: u8,
    },
    /// Take the exam interactively
    Play(commands::play::PlayArgs),
    /// Run a JSON intent script and print the resulting events
    Replay(commands::replay::ReplayArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Question bank tools
    Bank {
        #[command(subcommand)]
        action: commands::bank::BankAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Modules(args) => commands::modules::run(args),
        Commands::Grade { percentage } => commands::grade::run(percentage),
        Commands::Play(args) => commands::play::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Bank { action } => commands::bank::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
