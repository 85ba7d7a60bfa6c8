//! Datastore initializer.
//!
//! Opens (or creates) the persistent collection and decides between the
//! first-run and subsequent-run paths: an empty collection triggers a full
//! ingestion of the bundled dataset (read, chunk, embed, store), a non-empty
//! one is reused as-is. The non-zero vector count is the only guard — there
//! is no content-drift detection between runs; `wordsmith reindex` exists
//! for operators who changed the dataset.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::chunk::chunk_text;
use crate::config::{Config, COLLECTION_NAME};
use crate::dataset;
use crate::db;
use crate::embedding::{vec_to_blob, Embedder};
use crate::migrate;
use crate::models::{Chunk, Document};

/// Handle to the initialized collection.
#[derive(Debug)]
pub struct Datastore {
    pub pool: SqlitePool,
    pub collection: String,
    /// Number of embedded chunks in the collection after initialization.
    pub chunk_count: i64,
    /// Whether this call performed the first-run ingestion.
    pub ingested: bool,
}

/// Open the collection at `config.storage.db_path`, ingesting the dataset
/// on first run and reusing existing state afterwards.
///
/// First-run side effects: filesystem writes and one embeddings API call
/// per batch. Subsequent runs perform neither.
pub async fn fetch_or_initialise(config: &Config, embedder: &dyn Embedder) -> Result<Datastore> {
    let pool = db::connect(&config.storage).await?;
    migrate::run_migrations(&pool).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunk_vectors")
        .fetch_one(&pool)
        .await?;

    if existing > 0 {
        return Ok(Datastore {
            pool,
            collection: COLLECTION_NAME.to_string(),
            chunk_count: existing,
            ingested: false,
        });
    }

    let documents = dataset::load_documents(&config.dataset)
        .with_context(|| "Failed to load the dataset for first-run ingestion")?;

    register_collection(&pool, embedder).await?;

    let mut total_chunks = 0i64;
    for doc in &documents {
        let chunks = chunk_text(
            &doc.id,
            &doc.body,
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        );

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(config.embedding.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            // Provider failure aborts the whole ingestion, propagated as-is
            let batch_vectors = embedder.embed(&texts).await?;
            vectors.extend(batch_vectors);
        }

        store_document(&pool, doc, &chunks, &vectors, embedder).await?;
        total_chunks += chunks.len() as i64;
    }

    println!("ingested dataset into '{}'", COLLECTION_NAME);
    println!("  documents: {}", documents.len());
    println!("  chunks embedded: {}", total_chunks);

    Ok(Datastore {
        pool,
        collection: COLLECTION_NAME.to_string(),
        chunk_count: total_chunks,
        ingested: true,
    })
}

/// Delete all collection contents so the next initialization re-ingests.
pub async fn clear_collection(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM chunk_vectors")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM chunks").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM documents")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM collections")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

async fn register_collection(pool: &SqlitePool, embedder: &dyn Embedder) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        r#"
        INSERT INTO collections (name, model, dims, created_at) VALUES (?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET model = excluded.model, dims = excluded.dims
        "#,
    )
    .bind(COLLECTION_NAME)
    .bind(embedder.model_name())
    .bind(embedder.dims() as i64)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Store a document with its chunks and vectors in one transaction.
async fn store_document(
    pool: &SqlitePool,
    doc: &Document,
    chunks: &[Chunk],
    vectors: &[Vec<f32>],
    embedder: &dyn Embedder,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO documents (id, path, title, body, ingested_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            path = excluded.path,
            title = excluded.title,
            body = excluded.body,
            ingested_at = excluded.ingested_at
        "#,
    )
    .bind(&doc.id)
    .bind(&doc.path)
    .bind(&doc.title)
    .bind(&doc.body)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (chunk, vector) in chunks.iter().zip(vectors.iter()) {
        sqlx::query(
            "INSERT OR REPLACE INTO chunks (id, document_id, chunk_index, text) VALUES (?, ?, ?, ?)",
        )
        .bind(&chunk.id)
        .bind(&chunk.document_id)
        .bind(chunk.chunk_index)
        .bind(&chunk.text)
        .execute(&mut *tx)
        .await?;

        let blob = vec_to_blob(vector);
        sqlx::query(
            "INSERT OR REPLACE INTO chunk_vectors (chunk_id, document_id, model, dims, embedding) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&chunk.id)
        .bind(&chunk.document_id)
        .bind(embedder.model_name())
        .bind(embedder.dims() as i64)
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Collection counters for the `stats` command.
pub struct CollectionStats {
    pub documents: i64,
    pub chunks: i64,
    pub vectors: i64,
}

pub async fn collection_stats(pool: &SqlitePool) -> Result<CollectionStats> {
    let documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(pool)
        .await?;
    let chunks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
        .fetch_one(pool)
        .await?;
    let vectors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunk_vectors")
        .fetch_one(pool)
        .await?;
    Ok(CollectionStats {
        documents,
        chunks,
        vectors,
    })
}
