use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sift_engine::{InvertedIndex, SearchMode, Tokenizer, DEFAULT_MAX_DISTANCE};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{BufRead, BufReader};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    text: String,
}

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "In-memory full-text search over JSONL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an in-memory index from JSONL documents and run one query
    Search {
        /// Input JSONL file; one {"id": ..., "text": ...} record per line
        #[arg(long)]
        docs: String,
        /// Query text
        #[arg(long)]
        query: String,
        /// Search mode: or, and, phrase, proximity
        #[arg(long, default_value = "or")]
        mode: String,
        /// Proximity window in token positions
        #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE)]
        max_distance: usize,
    },
    /// Print the term sequence the engine produces for a text
    Tokens {
        /// Text to tokenize
        text: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            docs,
            query,
            mode,
            max_distance,
        } => run_search(&docs, &query, &mode, max_distance),
        Commands::Tokens { text } => {
            let terms = Tokenizer::new().tokenize(&text);
            println!("{}", serde_json::to_string(&terms)?);
            Ok(())
        }
    }
}

fn run_search(docs: &str, query: &str, mode: &str, max_distance: usize) -> Result<()> {
    let mode: SearchMode = mode.parse()?;

    let mut index: InvertedIndex<String> = InvertedIndex::new();
    let file = File::open(docs).with_context(|| format!("opening {docs}"))?;
    let reader = BufReader::new(file);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line).context("parsing JSONL record")?;
        index.add_document(doc.id, &doc.text);
    }
    tracing::info!(
        num_docs = index.num_docs(),
        num_terms = index.num_terms(),
        "indexed documents"
    );

    let hits = index.search_within(query, mode, max_distance)?;
    println!("{}", serde_json::to_string_pretty(&hits)?);
    Ok(())
}
