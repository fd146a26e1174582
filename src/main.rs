//! Grove CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "Compile Grove projects to and from Git-ready directory trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a project file into a directory tree
    Lower {
        /// Path to the project JSON file
        project: PathBuf,

        /// Directory to write the tree into
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Reconstruct a project from a directory tree
    Lift {
        /// Directory holding the project tree
        dir: PathBuf,

        /// Project id to lift under (random when omitted)
        #[arg(long)]
        project_id: Option<Uuid>,

        /// File to write the project JSON to (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Compare two directory trees
    Diff {
        /// Baseline tree directory
        original: PathBuf,

        /// Directory to compare against the baseline
        changed: PathBuf,
    },
    /// Check a project file for integrity violations
    Validate {
        /// Path to the project JSON file
        project: PathBuf,
    },
    /// Copy a project under fresh identifiers
    Fork {
        /// Path to the project JSON file
        project: PathBuf,

        /// File to write the forked project to
        #[arg(short, long)]
        out: PathBuf,

        /// Keep the project id and renumber only the entities inside
        #[arg(long)]
        keep_project_id: bool,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = format!(
        "grove={log_level},grove_core={log_level},grove_compiler={log_level},grove_git={log_level}"
    );
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Lower { project, out } => commands::lower(project, out).await,
        Commands::Lift {
            dir,
            project_id,
            out,
        } => commands::lift(dir, project_id, out).await,
        Commands::Diff { original, changed } => commands::diff(original, changed).await,
        Commands::Validate { project } => commands::validate(project),
        Commands::Fork {
            project,
            out,
            keep_project_id,
        } => commands::fork(project, out, keep_project_id),
        Commands::Version => {
            println!("Grove v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
