//! Summarize a document from the command line.
//!
//! Reads FILE (or stdin), runs it through the engine, and prints the
//! summary. Set `CONDENSE_TRANSFORMER_URL` to enable the abstractive
//! strategy.
//!
//! ```sh
//! condense report.txt --length short
//! cat notes.md | condense --method transformers --json
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use condense::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Chunked document summarizer.
#[derive(Parser)]
#[command(name = "condense", version)]
struct Cli {
    /// Input file. Reads stdin when omitted or "-".
    file: Option<PathBuf>,

    /// Summarization method: simple or transformers.
    #[arg(long, default_value = "simple")]
    method: String,

    /// Summary length: short, medium, or long.
    #[arg(long, default_value = "medium")]
    length: String,

    /// Maximum characters per chunk (clamped to 2000..=20000).
    #[arg(long, default_value_t = DEFAULT_CHUNK_CHARS as i64, allow_negative_numbers = true)]
    chunk_chars: i64,

    /// Chunks summarized at the same time.
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Print the full response as JSON.
    #[arg(long)]
    json: bool,
}

fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the summary.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let text = match read_input(cli.file.as_ref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to read input: {e}");
            std::process::exit(1);
        }
    };

    let request = match SummaryRequest::from_parts(
        text,
        Some(cli.method.as_str()),
        Some(cli.length.as_str()),
        Some(cli.chunk_chars),
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let registry = StrategyRegistry::probe(TransformerConfig::from_env()).await;
    let mut config = EngineConfig::default();
    if let Some(n) = cli.max_concurrency {
        config = config.with_max_concurrency(n);
    }
    let engine = Engine::new(registry, config);

    let response = match engine.run(request).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize response: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", response.summary);
    }
}
