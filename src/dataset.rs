//! Fixed dataset reader.
//!
//! Reads every matching file under the configured dataset directory into
//! [`Document`]s. The document id is the dataset-relative path, so identity
//! is stable across runs. A missing or unreadable directory fails the whole
//! operation — the dataset is a required input, not an optional source.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::DatasetConfig;
use crate::models::Document;

pub fn load_documents(config: &DatasetConfig) -> Result<Vec<Document>> {
    let root = &config.path;
    if !root.is_dir() {
        bail!("Dataset directory does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut documents = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if !include_set.is_match(&rel_str) {
            continue;
        }

        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        documents.push(Document {
            id: rel_str,
            path: path.display().to_string(),
            title,
            body,
        });
    }

    // Sort for deterministic ingestion order
    documents.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(documents)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn dataset_config(path: PathBuf) -> DatasetConfig {
        DatasetConfig {
            path,
            include_globs: vec!["**/*.txt".to_string(), "**/*.md".to_string()],
        }
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let config = dataset_config(PathBuf::from("/nonexistent/dataset"));
        let err = load_documents(&config).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_reads_matching_files_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "Second file.").unwrap();
        fs::write(tmp.path().join("a.txt"), "First file.").unwrap();
        fs::write(tmp.path().join("notes.json"), "{}").unwrap();

        let docs = load_documents(&dataset_config(tmp.path().to_path_buf())).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a.txt");
        assert_eq!(docs[1].id, "b.txt");
        assert_eq!(docs[0].body, "First file.");
        assert_eq!(docs[0].title, "a.txt");
    }

    #[test]
    fn test_id_is_relative_path() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/doc.md"), "# Nested").unwrap();

        let docs = load_documents(&dataset_config(tmp.path().to_path_buf())).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "sub/doc.md");
    }
}
