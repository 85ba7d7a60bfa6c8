//! Streaming chat-completion client.
//!
//! [`OpenAiChat`] calls `POST /v1/chat/completions` with `stream: true` and
//! turns the server-sent-event response into an [`AnswerStream`] of text
//! deltas. The stream is consumed synchronously by the shell; dropping it
//! cancels the request. Call failures propagate to the caller — there is
//! no retry or backoff.

use anyhow::{bail, Result};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;

use crate::config::{LlmConfig, API_KEY_VAR};

/// Incremental answer text, yielded as the model produces it.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Chat-model seam of the summarizer.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a fixed two-message prompt and stream the answer text.
    async fn stream_chat(&self, system: &str, user: &str) -> Result<AnswerStream>;
}

/// Chat model backed by the OpenAI chat completions API.
pub struct OpenAiChat {
    model: String,
    timeout_secs: u64,
}

impl OpenAiChat {
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not in the environment.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if std::env::var(API_KEY_VAR).is_err() {
            bail!("{} environment variable not set", API_KEY_VAR);
        }

        Ok(Self {
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn stream_chat(&self, system: &str, user: &str) -> Result<AnswerStream> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| anyhow::anyhow!("{} not set", API_KEY_VAR))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        let body = serde_json::json!({
            "model": self.model,
            "stream": true,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("OpenAI chat API error {}: {}", status, body_text);
        }

        let mut bytes = response.bytes_stream();

        let stream = try_stream! {
            let mut buf = String::new();
            'read: while let Some(chunk) = bytes.next().await {
                let chunk = chunk?;
                buf.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buf.find('\n') {
                    let line: String = buf.drain(..=pos).collect();
                    match parse_sse_line(line.trim())? {
                        SseLine::Delta(text) => yield text,
                        SseLine::Done => break 'read,
                        SseLine::Ignore => {}
                    }
                }
            }
        };

        Ok(Box::pin(stream) as AnswerStream)
    }
}

/// One parsed line of the event stream.
#[derive(Debug, PartialEq)]
enum SseLine {
    /// New answer text.
    Delta(String),
    /// End-of-stream marker (`data: [DONE]`).
    Done,
    /// Blank line, comment, or a delta without content (role header,
    /// finish chunk).
    Ignore,
}

fn parse_sse_line(line: &str) -> Result<SseLine> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseLine::Ignore);
    };
    let data = data.trim();

    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }
    if data.is_empty() {
        return Ok(SseLine::Ignore);
    }

    let json: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| anyhow::anyhow!("Malformed stream event: {}", e))?;

    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str());

    match content {
        Some(text) if !text.is_empty() => Ok(SseLine::Delta(text.to_string())),
        _ => Ok(SseLine::Ignore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(
            parse_sse_line(line).unwrap(),
            SseLine::Delta("Hello".to_string())
        );
    }

    #[test]
    fn test_parse_done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), SseLine::Done);
    }

    #[test]
    fn test_parse_blank_line_ignored() {
        assert_eq!(parse_sse_line("").unwrap(), SseLine::Ignore);
    }

    #[test]
    fn test_parse_role_header_ignored() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), SseLine::Ignore);
    }

    #[test]
    fn test_parse_finish_chunk_ignored() {
        let line = r#"data: {"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), SseLine::Ignore);
    }

    #[test]
    fn test_parse_malformed_json_errors() {
        assert!(parse_sse_line("data: {not json").is_err());
    }

    #[test]
    fn test_parse_non_data_line_ignored() {
        assert_eq!(parse_sse_line(": keep-alive").unwrap(), SseLine::Ignore);
    }
}
