//! # Wordsmith RAG CLI (`wordsmith`)
//!
//! Answers questions about the bundled Wordsmith dataset using
//! retrieve-then-summarize over a persistent vector collection.
//!
//! ## Usage
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! wordsmith                      # interactive chat (default)
//! wordsmith ask "What does Wordsmith build?"
//! wordsmith reindex              # clear the collection and re-ingest
//! wordsmith stats                # collection counters
//! ```
//!
//! All commands accept `--config` (TOML, optional — defaults are built in)
//! plus `--chunk-size` and `--chunk-overlap` overrides. `OPENAI_API_KEY`
//! must be set; its absence is a fatal error with exit status 1, checked
//! before any disk or network work.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use wordsmith_rag::{config, datastore, pipeline, shell};
use wordsmith_rag::embedding::OpenAiEmbedder;
use wordsmith_rag::llm::OpenAiChat;

/// Wordsmith RAG — a retrieval-augmented Q&A demo over the bundled
/// Wordsmith dataset.
#[derive(Parser)]
#[command(
    name = "wordsmith",
    about = "Retrieval-augmented Q&A over the bundled Wordsmith dataset",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults apply when the
    /// file does not exist.
    #[arg(long, global = true, default_value = "./config/wordsmith.toml")]
    config: PathBuf,

    /// Maximum chunk size in tokens.
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Token overlap between consecutive chunks.
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level CLI commands. With no subcommand, interactive chat is selected.
#[derive(Subcommand)]
enum Commands {
    /// Interactive chat: read a query, stream the answer, repeat.
    Chat,

    /// Ask a single question and exit.
    Ask {
        /// The query string.
        query: String,
    },

    /// Clear the collection and re-ingest the dataset from scratch.
    ///
    /// The collection is only (re)built when it is empty; run this after
    /// changing the dataset.
    Reindex,

    /// Print collection counters (documents, chunks, vectors).
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Credential guard: fail fast before any disk or network work.
    if std::env::var(config::API_KEY_VAR).is_err() {
        eprintln!(
            "Error: {} is not set. Export your OpenAI API key and try again.",
            config::API_KEY_VAR
        );
        std::process::exit(1);
    }

    let mut cfg = config::load_config(&cli.config)?;
    if let Some(chunk_size) = cli.chunk_size {
        cfg.chunking.chunk_size = chunk_size;
    }
    if let Some(chunk_overlap) = cli.chunk_overlap {
        cfg.chunking.chunk_overlap = chunk_overlap;
    }
    config::validate(&cfg)?;

    let embedder: Arc<OpenAiEmbedder> = Arc::new(OpenAiEmbedder::new(&cfg.embedding)?);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let store = datastore::fetch_or_initialise(&cfg, embedder.as_ref()).await?;
            println!(
                "collection '{}' ready ({} chunks)",
                store.collection, store.chunk_count
            );

            let chat = Arc::new(OpenAiChat::new(&cfg.llm)?);
            let pipeline =
                pipeline::build_pipeline(store.pool.clone(), embedder, chat, cfg.retrieval.top_k);
            shell::run_chat(&pipeline).await?;
            store.pool.close().await;
        }
        Commands::Ask { query } => {
            let store = datastore::fetch_or_initialise(&cfg, embedder.as_ref()).await?;
            let chat = Arc::new(OpenAiChat::new(&cfg.llm)?);
            let pipeline =
                pipeline::build_pipeline(store.pool.clone(), embedder, chat, cfg.retrieval.top_k);
            shell::answer_query(&pipeline, &query).await?;
            store.pool.close().await;
        }
        Commands::Reindex => {
            let pool = wordsmith_rag::db::connect(&cfg.storage).await?;
            wordsmith_rag::migrate::run_migrations(&pool).await?;
            datastore::clear_collection(&pool).await?;
            pool.close().await;

            let store = datastore::fetch_or_initialise(&cfg, embedder.as_ref()).await?;
            println!(
                "collection '{}' rebuilt ({} chunks)",
                store.collection, store.chunk_count
            );
            store.pool.close().await;
        }
        Commands::Stats => {
            let pool = wordsmith_rag::db::connect(&cfg.storage).await?;
            wordsmith_rag::migrate::run_migrations(&pool).await?;
            let stats = datastore::collection_stats(&pool).await?;
            println!("collection '{}'", config::COLLECTION_NAME);
            println!("  documents: {}", stats.documents);
            println!("  chunks:    {}", stats.chunks);
            println!("  vectors:   {}", stats.vectors);
            pool.close().await;
        }
    }

    Ok(())
}
