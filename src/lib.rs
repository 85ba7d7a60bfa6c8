//! # Wordsmith RAG
//!
//! A retrieval-augmented Q&A demo over a small, fixed document set.
//!
//! The `wordsmith` binary embeds and indexes the bundled dataset into a
//! persistent SQLite collection on first run, then answers operator queries
//! through a two-stage pipeline: top-K nearest-neighbor retrieval feeding a
//! streaming LLM summarizer with a fixed prompt.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────────┐   ┌──────────┐
//! │ dataset │──▶│ chunk + embed │──▶│  SQLite   │
//! │  (./)   │   │  (first run)  │   │ vectors   │
//! └─────────┘   └──────────────┘   └────┬─────┘
//!                                       │
//!                          query ──▶ retriever ──▶ summarizer ──▶ streamed
//!                                    (top-K)       (LLM, SSE)     answer
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`dataset`] | Fixed dataset reader |
//! | [`chunk`] | Text chunking with overlap |
//! | [`embedding`] | Embedding provider seam + OpenAI client |
//! | [`datastore`] | First-run ingestion vs. collection reuse |
//! | [`retrieve`] | Cosine top-K retrieval |
//! | [`llm`] | Streaming chat-completion client |
//! | [`summarize`] | Fixed prompts + summarizer stage |
//! | [`pipeline`] | Two-node query pipeline |
//! | [`shell`] | Interactive query loop |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod chunk;
pub mod config;
pub mod dataset;
pub mod datastore;
pub mod db;
pub mod embedding;
pub mod llm;
pub mod migrate;
pub mod models;
pub mod pipeline;
pub mod retrieve;
pub mod shell;
pub mod summarize;
