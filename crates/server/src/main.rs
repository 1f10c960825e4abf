use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use pdfchat_core::Config;
use pdfchat_ingest::document::is_pdf_filename;
use pdfchat_server::cli::{Cli, Command};
use pdfchat_server::{build_router, pipeline, AppState};

fn load_config() -> Config {
    pdfchat_core::config::load_dotenv();
    Config::from_env()
}

fn build_state(config: &Config) -> anyhow::Result<AppState> {
    AppState::from_config(config).with_context(|| {
        format!(
            "failed to initialise LLM/embedding providers (LLM_PROVIDER={}, EMBEDDING_PROVIDER={})",
            config.llm.provider, config.embedding.provider
        )
    })
}

async fn serve(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    config.log_summary();
    debug!(config = %config.redacted_summary(), "Effective configuration");

    let state = Arc::new(build_state(config)?);
    if state.index_store.exists().await {
        info!("Existing index found at {}", state.index_store.path().display());
    } else {
        info!("No index yet; POST /upload to create one");
    }

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ingest(config: &Config, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let state = build_state(config)?;

    let (pdfs, skipped): (Vec<PathBuf>, Vec<PathBuf>) = files
        .into_iter()
        .partition(|p| is_pdf_filename(&p.to_string_lossy()));
    for path in &skipped {
        warn!("Skipping non-PDF file {}", path.display());
    }

    let report = pipeline::ingest_files(&state, pdfs).await?;
    println!(
        "Indexed {} file(s), {} page(s), {} chunk(s) into {}",
        report.files,
        report.pages,
        report.chunks,
        state.index_store.path().display()
    );
    Ok(())
}

async fn ask(config: &Config, question: &str) -> anyhow::Result<()> {
    if question.trim().is_empty() {
        anyhow::bail!("No question provided");
    }
    let state = build_state(config)?;
    let answer = pipeline::answer_question(&state, question).await?;
    println!("{answer}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command() {
        Command::Serve { port } => serve(&config, port).await,
        Command::Ingest { files } => ingest(&config, files).await,
        Command::Ask { question } => ask(&config, &question).await,
    }
}
