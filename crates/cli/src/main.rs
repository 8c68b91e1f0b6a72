//! # researchdesk: a terminal client for the research-report service
//!
//! This is the main entry point for the `researchdesk` command-line interface.
//! Without a subcommand it opens the interactive terminal UI.

mod app;
mod commands;
mod tui;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use researchdesk::{get_config, Controller, HttpResearchApi};
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file (defaults to ./researchdesk.yml if present)
    #[arg(long, global = true)]
    config: Option<String>,
    /// Root URL of the research service, overriding the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive terminal UI
    Tui,
    /// List the models the service can use
    Models,
    /// List the available knowledge bases
    KnowledgeBases,
    /// Upload a document into a knowledge base
    Upload(commands::UploadArgs),
    /// Request a research report
    Research(commands::ResearchArgs),
    /// List uploaded documents
    Files,
    /// Delete an uploaded document
    DeleteFile(commands::DeleteFileArgs),
    /// Download the DOCX rendition of a finished report
    Download(commands::DownloadArgs),
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = get_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    // Log to a file so the terminal UI is never written over.
    let log_file = File::create(&config.log_file)?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    info!("Using research service at {}", config.base_url);

    let api = HttpResearchApi::new(&config.base_url)?;
    let controller = Controller::new(Arc::new(api), &config);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => tui::run(controller).await?,
        Commands::Models => commands::handle_models(&controller).await,
        Commands::KnowledgeBases => commands::handle_knowledge_bases(&controller).await,
        Commands::Upload(args) => commands::handle_upload(&controller, &args).await,
        Commands::Research(args) => commands::handle_research(&controller, &args).await,
        Commands::Files => commands::handle_files(&controller).await?,
        Commands::DeleteFile(args) => commands::handle_delete_file(&controller, &args).await?,
        Commands::Download(args) => commands::handle_download(&controller, &args).await?,
    }

    Ok(())
}
