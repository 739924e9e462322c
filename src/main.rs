use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use gemini_pdf_qa::config::Config;
use gemini_pdf_qa::document::RemotePdfLoader;
use gemini_pdf_qa::gemini::GeminiClient;
use gemini_pdf_qa::qa::QaEngine;
use gemini_pdf_qa::server;

/// Answer questions about a remote PDF document using Gemini
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Words per chunk sent to the model
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Maximum number of model calls in flight
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Seconds before a single model call is abandoned
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Answer questions about one document and print the results
    Ask {
        /// URL of the PDF document
        pdf_url: String,
        /// Questions to answer
        #[arg(required = true)]
        questions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    // Load configuration from environment, then apply command line overrides
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(chunk_size) = args.chunk_size {
        config.qa.chunk_size = chunk_size;
    }
    if let Some(concurrency) = args.concurrency {
        config.qa.max_concurrency = concurrency;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.qa.model_timeout = Duration::from_secs(timeout_secs);
    }

    info!("Using model: {}", config.gemini.model);
    let loader = RemotePdfLoader::new(config.fetch_timeout, config.max_document_bytes)?;
    let gemini = GeminiClient::new(config.gemini.clone());
    let engine = Arc::new(
        QaEngine::new(Arc::new(loader), Arc::new(gemini), config.qa.clone())
            .context("Invalid pipeline settings")?,
    );

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            server::serve(engine, port.unwrap_or(config.port)).await?;
        }
        Command::Ask { pdf_url, questions } => {
            let answers = engine
                .run(&pdf_url, &questions)
                .await
                .context("Failed to process document")?;

            for (question, answer) in questions.iter().zip(answers) {
                println!("Q: {}", question);
                if answer.is_empty() {
                    println!("A: (no answer found)\n");
                } else {
                    println!("A: {}\n", answer.trim());
                }
            }
        }
    }

    Ok(())
}
