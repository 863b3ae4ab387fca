//! examforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examforge", version, about = "Deterministic randomized exam generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate individualized exams for a roster
    Generate {
        /// Path to the exam specification TOML
        #[arg(long)]
        exam: PathBuf,

        /// Path to the student roster TOML
        #[arg(long)]
        roster: PathBuf,

        /// Output directory for manifests and the cohort snapshot
        #[arg(long, default_value = "./examforge-out")]
        output: PathBuf,

        /// Student ID policy: uniqname, random-v4, or namespaced-v5
        #[arg(long, default_value = "uniqname")]
        student_ids: String,

        /// Namespace for namespaced-v5 IDs (at least 16 characters)
        #[arg(long)]
        uuidv5_namespace: Option<String>,

        /// Bypass randomization: every chooser returns its full pool
        #[arg(long)]
        choose_all: bool,

        /// Permit duplicate siblings and multi-skin variants
        #[arg(long)]
        allow_duplicates: bool,

        /// One shared seed for all students
        #[arg(long)]
        consistent_randomization: bool,
    },

    /// Validate an exam specification TOML
    Validate {
        /// Path to the exam specification TOML
        #[arg(long)]
        exam: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examforge_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            exam,
            roster,
            output,
            student_ids,
            uuidv5_namespace,
            choose_all,
            allow_duplicates,
            consistent_randomization,
        } => commands::generate::execute(
            exam,
            roster,
            output,
            student_ids,
            uuidv5_namespace,
            choose_all,
            allow_duplicates,
            consistent_randomization,
        ),
        Commands::Validate { exam } => commands::validate::execute(exam),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
