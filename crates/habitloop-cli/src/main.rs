use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "habitloop-cli", version, about = "Habitloop CLI")]
struct Cli {
    /// Date to treat as today (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true, value_parser = common::parse_date)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Record or undo completions
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Habits due today, with a motivational message
    Today,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(common::local_today);
    tracing::debug!(%today, "reference date");

    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action, today),
        Commands::Progress { action } => commands::progress::run(action, today),
        Commands::Stats { action } => commands::stats::run(action, today),
        Commands::Today => commands::today::run(today),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "habitloop-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
