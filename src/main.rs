use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use echosensai::{
    run_analysis, AnalysisStore, AppConfig, AzureOpenAiClient, DeepgramClient, FileStore,
    HttpMediaResolver,
};

#[derive(Parser)]
#[command(name = "echosensai")]
#[command(author, version, about = "AI-powered call analysis pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a call recording, or replay the stored analysis if the URL
    /// was already submitted
    Analyze {
        /// URL of the audio recording (mp3)
        #[arg(short, long)]
        url: String,

        /// Directory holding the analysis records
        #[arg(long, default_value = ".echosensai")]
        store_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the stored analysis record for a URL without running anything
    Show {
        /// URL of the audio recording (mp3)
        #[arg(short, long)]
        url: String,

        /// Directory holding the analysis records
        #[arg(long, default_value = ".echosensai")]
        store_dir: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            url,
            store_dir,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(url, store_dir).await
        }
        Commands::Show {
            url,
            store_dir,
            verbose,
        } => {
            setup_logging(verbose);
            show(url, store_dir).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn analyze(url: String, store_dir: PathBuf) -> Result<()> {
    let config = AppConfig::from_env()?;

    let resolver = HttpMediaResolver::new(config.request_timeout)?;
    let diarizer = DeepgramClient::new(config.deepgram.clone(), config.request_timeout)?;
    let chat = AzureOpenAiClient::new(config.openai.clone(), config.request_timeout)?;
    let store = FileStore::open(&store_dir)?;

    info!(%url, "submitting call for analysis");
    let analysis = run_analysis(&resolver, &diarizer, &chat, &store, &config.pipeline, &url)
        .await
        .context("analysis failed")?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn show(url: String, store_dir: PathBuf) -> Result<()> {
    let store = FileStore::open(&store_dir)?;

    match store.find(&url).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => {
            println!("No stored analysis for {url}");
        }
    }
    Ok(())
}
