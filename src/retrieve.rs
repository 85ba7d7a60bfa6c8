//! Top-K nearest-neighbor retrieval over the stored chunk vectors.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::embedding::{blob_to_vec, cosine_similarity, Embedder};
use crate::models::ScoredChunk;

/// Retrieval seam of the query pipeline.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return the chunks most similar to `query`, best first.
    async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>>;
}

/// Cosine-similarity retriever over the persistent collection.
///
/// Embeds the query, scans every stored vector, and keeps the `top_k`
/// highest-scoring chunks. `top_k` is a fixed configuration value; there
/// is no relevance threshold. Empty and whitespace-only queries are
/// embedded like any other string.
pub struct VectorRetriever {
    pool: SqlitePool,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl VectorRetriever {
    pub fn new(pool: SqlitePool, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            pool,
            embedder,
            top_k,
        }
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let query_vec = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Empty embedding response"))?;

        let rows = sqlx::query(
            r#"
            SELECT cv.chunk_id, cv.document_id, cv.embedding, c.text
            FROM chunk_vectors cv
            JOIN chunks c ON c.id = cv.chunk_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut candidates: Vec<ScoredChunk> = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("embedding");
                let vec = blob_to_vec(&blob);
                let similarity = cosine_similarity(&query_vec, &vec) as f64;
                ScoredChunk {
                    chunk_id: row.get("chunk_id"),
                    document_id: row.get("document_id"),
                    text: row.get("text"),
                    score: similarity,
                }
            })
            .collect();

        // Sort by similarity desc, chunk id asc for determinism on ties
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        candidates.truncate(self.top_k);

        Ok(candidates)
    }
}
