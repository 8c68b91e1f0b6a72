//! # One-shot Commands
//!
//! Each subcommand fills in the page the same way the terminal UI would, runs
//! one controller handler, and prints the page region it wrote to.

use anyhow::Result;
use clap::Parser;
use researchdesk::page::SelectOption;
use researchdesk::types::ResearchInformation;
use researchdesk::Controller;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// The document to upload
    pub file: Option<PathBuf>,
    /// The knowledge base to upload into (created by the service if new)
    #[arg(long, short = 'k', default_value = "")]
    pub knowledge_base: String,
}

#[derive(Parser, Debug)]
pub struct ResearchArgs {
    /// What to research
    pub task: String,
    /// The model id, as listed by `researchdesk models`
    #[arg(long, short = 'm', default_value = "")]
    pub model: String,
    /// The knowledge base to research against
    #[arg(long, short = 'k', default_value = "")]
    pub knowledge_base: String,
    /// Run a deep-research report instead of a standard one
    #[arg(long)]
    pub deep: bool,
    #[arg(long, default_value = "2")]
    pub max_iterations: String,
    #[arg(long, default_value = "4")]
    pub max_search_results: String,
    #[arg(long, default_value = "4")]
    pub max_content_results: String,
}

#[derive(Parser, Debug)]
pub struct DeleteFileArgs {
    /// Name of the uploaded document
    pub filename: String,
}

#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// The research id printed when the report finished
    pub research_id: String,
    /// Where to write the DOCX file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

pub async fn handle_models(controller: &Controller) {
    controller.load_models().await;
    let page = controller.snapshot().await;
    for option in page.models.options() {
        if option.disabled {
            println!("{}", option.label);
        } else if !option.value.is_empty() {
            println!("{}", option.value);
        }
    }
}

pub async fn handle_knowledge_bases(controller: &Controller) {
    controller.load_knowledge_bases().await;
    let page = controller.snapshot().await;
    if page.knowledge_bases.is_empty() {
        println!("No knowledge bases found.");
        return;
    }
    for option in page.knowledge_bases.options() {
        println!("{}", option.value);
    }
}

pub async fn handle_upload(controller: &Controller, args: &UploadArgs) {
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.upload.file = args.file.clone();
        page.upload.knowledge_base = args.knowledge_base.clone();
    }

    controller.submit_upload().await;
    println!("{}", controller.snapshot().await.upload.status);
}

pub async fn handle_research(controller: &Controller, args: &ResearchArgs) {
    {
        let page = controller.page();
        let mut page = page.write().await;
        page.task = args.task.clone();
        page.models
            .replace_options(vec![SelectOption::new(args.model.clone())]);
        page.knowledge_bases
            .replace_options(vec![SelectOption::new(args.knowledge_base.clone())]);
        page.deep_research.max_iterations = args.max_iterations.clone();
        page.deep_research.max_search_results_per_query = args.max_search_results.clone();
        page.deep_research.max_content_results_per_query = args.max_content_results.clone();
    }
    controller.set_deep_research(args.deep).await;

    controller.submit_research().await;
    let page = controller.snapshot().await;
    println!("{}", page.results);
    if let Some(research_id) = page.last_research_id {
        eprintln!("Research ID: {research_id}");
    }
    if let Some(info) = &page.last_research_information {
        eprint!("{}", research_summary(info));
    }
}

/// The sources and cost of a finished report, one line each.
pub fn research_summary(info: &ResearchInformation) -> String {
    let mut summary = String::new();
    if let Some(cost) = info.research_costs {
        summary.push_str(&format!("Research cost: ${cost:.4}\n"));
    }
    if !info.source_urls.is_empty() {
        summary.push_str(&format!("Sources ({}):\n", info.source_urls.len()));
        for url in &info.source_urls {
            summary.push_str(&format!("  {url}\n"));
        }
    }
    summary
}

pub async fn handle_files(controller: &Controller) -> Result<()> {
    let response = controller.api().list_files().await?;
    if response.files.is_empty() {
        println!("No files uploaded.");
    }
    for file in response.files {
        println!("{file}");
    }
    Ok(())
}

pub async fn handle_delete_file(controller: &Controller, args: &DeleteFileArgs) -> Result<()> {
    let response = controller.api().delete_file(&args.filename).await?;
    println!(
        "{}",
        response
            .message
            .unwrap_or_else(|| format!("Deleted {}", args.filename))
    );
    Ok(())
}

pub async fn handle_download(controller: &Controller, args: &DownloadArgs) -> Result<()> {
    let bytes = controller
        .api()
        .fetch_report_document(&args.research_id)
        .await?;
    tokio::fs::write(&args.output, &bytes).await?;
    info!(
        "Wrote {} bytes for '{}' to {}",
        bytes.len(),
        args.research_id,
        args.output.display()
    );
    println!("Saved report to {}", args.output.display());
    Ok(())
}
