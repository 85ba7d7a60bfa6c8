//! Two-node query pipeline: retriever feeding summarizer.
//!
//! The wiring mirrors the directed graph `input -> retriever`,
//! `input -> summarizer.query_str`, `retriever -> summarizer.nodes`.
//! The pipeline is stateless and reusable: it is built once per process
//! and each query runs with only the retrieved context plus the fixed
//! instructions, with no memory of prior queries.

use anyhow::Result;
use std::sync::Arc;

use crate::embedding::Embedder;
use crate::llm::{AnswerStream, ChatModel};
use crate::retrieve::{Retriever, VectorRetriever};
use crate::summarize::{LlmSummarizer, Summarizer};

pub struct QueryPipeline {
    retriever: Arc<dyn Retriever>,
    summarizer: Arc<dyn Summarizer>,
}

impl QueryPipeline {
    pub fn new(retriever: Arc<dyn Retriever>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            retriever,
            summarizer,
        }
    }

    /// Run one query through both stages, returning the streamed answer.
    pub async fn run(&self, query: &str) -> Result<AnswerStream> {
        let nodes = self.retriever.retrieve(query).await?;
        self.summarizer.summarize(&nodes, query).await
    }
}

/// Wire the concrete stages over the initialized collection.
pub fn build_pipeline(
    pool: sqlx::SqlitePool,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    top_k: usize,
) -> QueryPipeline {
    let retriever = Arc::new(VectorRetriever::new(pool, embedder, top_k));
    let summarizer = Arc::new(LlmSummarizer::new(chat));
    QueryPipeline::new(retriever, summarizer)
}
