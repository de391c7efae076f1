//! atelier: inspect a workspace snapshot and run the support classifier.
//!
//! Snapshots are JSON documents `{ "folders": [...], "projects": [...],
//! "tracks": [...] }`. Results are printed to stdout as JSON; logs go to
//! stderr or to `LOG_FILE`.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use atelier_support::{EscalationLevel, SupportNote};
use atelier_workspace::{CascadeMode, Workspace, WorkspaceConfig};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Workspace tree and support tools for atelier")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the folder tree in display order
    Tree {
        /// Snapshot file ("-" for stdin)
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Check whether a folder may move under a new parent
    CheckMove {
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Folder to move
        #[arg(short, long)]
        folder: Uuid,

        /// New parent folder (omit for the root)
        #[arg(short, long)]
        target: Option<Uuid>,
    },

    /// Plan deleting a folder
    PlanDelete {
        #[arg(short, long)]
        snapshot: PathBuf,

        #[arg(short, long)]
        folder: Uuid,

        /// Cascade mode for non-empty folders: empty or delete_all
        #[arg(short, long)]
        mode: Option<CascadeMode>,

        /// Print the snapshot after applying the plan instead of the plan
        #[arg(long)]
        apply: bool,
    },

    /// List the folders and projects under a parent
    List {
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Parent folder (omit for the root)
        #[arg(short, long)]
        parent: Option<Uuid>,
    },

    /// Classify a user note for escalation
    Classify {
        /// Note text
        note: Option<String>,

        /// Level the previous note was classified at
        #[arg(long, value_parser = parse_level)]
        prior: Option<EscalationLevel>,
    },

    /// Review a draft reply before it is shown
    CheckResponse {
        /// Draft reply text
        draft: String,

        /// User note the reply answers
        #[arg(short, long)]
        note: Option<String>,
    },
}

fn parse_level(raw: &str) -> Result<EscalationLevel, String> {
    match raw.to_ascii_uppercase().replace('-', "_").as_str() {
        "NONE" => Ok(EscalationLevel::None),
        "SOFT_ALERT" => Ok(EscalationLevel::SoftAlert),
        "URGENT_HELP" => Ok(EscalationLevel::UrgentHelp),
        other => Err(format!("unknown escalation level: {}", other)),
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(subsystem = "cli", error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<serde_json::Value> {
    let config = WorkspaceConfig::load()?;

    match cli.command {
        Commands::Tree { snapshot } => {
            let ws = Workspace::build(commands::load_snapshot(&snapshot)?)?;
            commands::tree(&ws)
        }
        Commands::CheckMove {
            snapshot,
            folder,
            target,
        } => {
            let ws = Workspace::build(commands::load_snapshot(&snapshot)?)?;
            commands::check_move(&ws, folder, target, &config.limits())
        }
        Commands::PlanDelete {
            snapshot,
            folder,
            mode,
            apply,
        } => commands::delete(commands::load_snapshot(&snapshot)?, folder, mode, apply),
        Commands::List { snapshot, parent } => {
            let ws = Workspace::build(commands::load_snapshot(&snapshot)?)?;
            commands::list(&ws, parent, config.node_preview_limit)
        }
        Commands::Classify { note, prior } => commands::classify(SupportNote { text: note, prior }),
        Commands::CheckResponse { draft, note } => commands::check_response(note.as_deref(), &draft),
    }
}

/// Initialize tracing from the environment.
///
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, daily rotation)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "atelier=info")
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "atelier=info,atelier_core=info,atelier_workspace=info,atelier_support=info".into()
    });
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("atelier.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            // no ANSI in files unless asked for
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // stdout carries command output
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}
