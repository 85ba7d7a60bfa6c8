//! Core data types flowing through the ingestion and query pipeline.

/// A source document read from the bundled dataset.
///
/// The id is the dataset-relative file path, so a document keeps the same
/// identity across runs. Documents are written once at first ingestion and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub path: String,
    pub title: String,
    pub body: String,
}

/// A chunk of a document's body text, sized for embedding.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub chunk_index: i64,
    pub text: String,
}

/// A chunk returned by the retriever, with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub text: String,
    pub score: f64,
}
