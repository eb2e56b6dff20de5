mod config;
mod dispatch;
mod errors;
mod letter;
mod llm_client;
mod mail;
mod render;
mod resume;
mod sender;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::errors::AppError;
use crate::letter::build_letters;
use crate::llm_client::LlmClient;
use crate::mail::SmtpMailer;
use crate::render::DocumentRenderer;
use crate::resume::build_resumes;
use crate::sender::SenderPool;
use crate::store::records::{Application, JobOffer};
use crate::store::{CsvStore, TABLE_APPLICATIONS, TABLE_JOBOFFERS};

/// Job-application pipeline: generate résumé and cover-letter PDFs, e-mail
/// them to recruiters, track what has been sent.
#[derive(Parser)]
#[command(name = "applyflow", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate missing résumé PDFs
    Resumes {
        /// Regenerate PDFs even when they already exist
        #[arg(long)]
        force: bool,
    },
    /// Generate missing cover-letter PDFs
    Letters {
        /// Regenerate PDFs even when they already exist
        #[arg(long)]
        force: bool,
    },
    /// E-mail every pending application and mark it sent
    Send {
        /// Keep sending after a transport failure instead of aborting
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fatal on missing required env vars)
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting applyflow v{}", env!("CARGO_PKG_VERSION"));

    let store = CsvStore::new(&config.data_dir);
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let renderer = DocumentRenderer::new(&config.templates_dir, &config.pdf_converter);

    match cli.command {
        Some(Command::Resumes { force }) => {
            build_resumes(&store, &llm, &renderer, &config.cv_dir, force).await?;
        }
        Some(Command::Letters { force }) => {
            build_letters(&store, &llm, &renderer, &config.letter_dir, force).await?;
        }
        Some(Command::Send { force }) => {
            send_applications(&store, &config, force).await?;
        }
        None => run_pipeline(&store, &llm, &renderer, &config).await?,
    }

    Ok(())
}

/// The full pipeline in fixed order, then a tiny recap.
async fn run_pipeline(
    store: &CsvStore,
    llm: &LlmClient,
    renderer: &DocumentRenderer,
    config: &Config,
) -> Result<(), AppError> {
    build_resumes(store, llm, renderer, &config.cv_dir, false).await?;
    build_letters(store, llm, renderer, &config.letter_dir, false).await?;
    send_applications(store, config, false).await?;

    let offers: Vec<JobOffer> = store.load(TABLE_JOBOFFERS)?;
    let applications: Vec<Application> = store.load(TABLE_APPLICATIONS)?;
    println!("{} job offers recorded", offers.len());
    println!("{} applications in total", applications.len());

    Ok(())
}

async fn send_applications(store: &CsvStore, config: &Config, force: bool) -> Result<(), AppError> {
    let mut pool = SenderPool::load(store, config)?;
    dispatch(
        store,
        &mut pool,
        &SmtpMailer,
        &config.cv_dir,
        &config.letter_dir,
        force,
    )
    .await?;
    Ok(())
}
