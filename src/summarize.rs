//! Summarization stage: fixed prompt templates plus the LLM call.
//!
//! The summarizer receives the retrieved chunks (`nodes`) and the operator's
//! query (`query_str`), renders them into the fixed two-message prompt, and
//! streams the model's answer. It holds no state between queries.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::llm::{AnswerStream, ChatModel};
use crate::models::ScoredChunk;

/// Persona and behavioral constraints for every answer.
pub const SYSTEM_PROMPT: &str = "You are an expert Q&A analyst representing Wordsmith in front of \
potentially interested users.\n\
If the question is related to Wordsmith in any way, \
answer the query using the provided context information.\n\
If you can't find the answer in the provided context information, \
simply say you don't have enough information to answer the query.\n\
Always be polite and professional.\n\
Some rules to follow:\n\
1. Never directly reference the given context in your answer.\n\
2. Avoid statements like 'Based on the context, ...' or \
'The context information ...', etc.";

/// User message template; `{context_str}` and `{query_str}` are filled in
/// per query.
pub const USER_PROMPT_TEMPLATE: &str = "Context information from multiple sources is below.\n\
---------------------\n\
{context_str}\n\
---------------------\n\
Given the information from multiple sources and not prior knowledge, \
answer the query.\n\
Query: {query_str}\n\
Answer: ";

/// Summarization seam of the query pipeline.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a streamed answer from the retrieved chunks and the query.
    async fn summarize(&self, nodes: &[ScoredChunk], query_str: &str) -> Result<AnswerStream>;
}

/// Summarizer that renders the fixed prompt and streams from a chat model.
pub struct LlmSummarizer {
    chat: Arc<dyn ChatModel>,
}

impl LlmSummarizer {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, nodes: &[ScoredChunk], query_str: &str) -> Result<AnswerStream> {
        let user = render_user_prompt(nodes, query_str);
        self.chat.stream_chat(SYSTEM_PROMPT, &user).await
    }
}

/// Join the retrieved chunk texts into `context_str` and interpolate the
/// user message template.
pub fn render_user_prompt(nodes: &[ScoredChunk], query_str: &str) -> String {
    let context_str = nodes
        .iter()
        .map(|n| n.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    USER_PROMPT_TEMPLATE
        .replace("{context_str}", &context_str)
        .replace("{query_str}", query_str)
}
