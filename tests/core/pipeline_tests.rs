//! End-to-end pipeline tests over a filesystem fixture

use std::fs;
use tempfile::TempDir;

use semdex::core::pipeline::NO_RESULTS_MESSAGE;
use semdex::core::types::MetadataFilter;
use semdex::SemdexError;

use crate::common::create_test_services;

/// A small project tree: prose, markdown with a fence, code, and
/// content that must stay out of the index.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("README.md"), "# Demo\n\nZebra migration notes.\n\n```python\ndef zebra():\n    return 1\n```\n").unwrap();
    fs::write(root.join("notes.txt"), "The quarterly budget meeting moved to Thursday.").unwrap();

    fs::create_dir(root.join("src")).unwrap();
    fs::write(
        root.join("src").join("main.rs"),
        "fn main() {\n    println!(\"hello\");\n}",
    )
    .unwrap();

    fs::create_dir(root.join("node_modules")).unwrap();
    fs::write(root.join("node_modules").join("dep.js"), "excluded dependency code").unwrap();

    fs::write(root.join(".gitignore"), "secret.txt\n").unwrap();
    fs::write(root.join("secret.txt"), "classified payload").unwrap();

    dir
}

#[tokio::test]
async fn test_index_directory_and_round_trip_query() {
    let dir = fixture();
    let services = create_test_services(dir.path());

    let stats = services.pipeline.index(".").await.unwrap();
    assert_eq!(stats.files_indexed, 3); // README.md, notes.txt, src/main.rs
    assert!(stats.chunks_indexed >= 4);
    assert_eq!(stats.chunks_skipped, 0);

    let result = services
        .pipeline
        .query("quarterly budget meeting moved to Thursday", Some(1), None)
        .await
        .unwrap();
    assert!(result.contains("[DOCUMENT:notes_txt_chunk1]"));
    assert!(result.contains("quarterly budget meeting"));
}

#[tokio::test]
async fn test_ignored_content_never_indexed() {
    let dir = fixture();
    let services = create_test_services(dir.path());
    services.pipeline.index(".").await.unwrap();

    let sources = services.pipeline.list_sources().await.unwrap();
    assert!(!sources.iter().any(|s| s.contains("secret.txt")));
    assert!(!sources.iter().any(|s| s.contains("node_modules")));
    assert!(!sources.iter().any(|s| s.contains(".gitignore")));
}

#[tokio::test]
async fn test_markdown_fence_indexed_as_code() {
    let dir = fixture();
    let services = create_test_services(dir.path());
    services.pipeline.index("README.md").await.unwrap();

    let filter = MetadataFilter::equals("contentType", "code");
    let result = services
        .pipeline
        .query("def zebra return", Some(5), Some(filter))
        .await
        .unwrap();
    assert!(result.contains("def zebra"));
    assert!(!result.contains("migration notes"));
}

#[tokio::test]
async fn test_list_sources_counts_files_not_chunks() {
    let dir = fixture();
    let services = create_test_services(dir.path());
    services.pipeline.index(".").await.unwrap();

    let sources = services.pipeline.list_sources().await.unwrap();
    assert_eq!(sources.len(), 3);
}

#[tokio::test]
async fn test_remove_document_then_query_misses_it() {
    let dir = fixture();
    let services = create_test_services(dir.path());
    services.pipeline.index(".").await.unwrap();

    services.pipeline.remove_by_source("notes.txt").await.unwrap();

    let sources = services.pipeline.list_sources().await.unwrap();
    assert!(!sources.contains(&"notes.txt".to_string()));

    let filter = MetadataFilter::equals("sourcePath", "notes.txt");
    let result = services
        .pipeline
        .query("quarterly budget", Some(5), Some(filter))
        .await
        .unwrap();
    assert_eq!(result, NO_RESULTS_MESSAGE);
}

#[tokio::test]
async fn test_remove_all_requires_confirmation() {
    let dir = fixture();
    let services = create_test_services(dir.path());
    services.pipeline.index(".").await.unwrap();

    let err = services.pipeline.remove_all(false).await.unwrap_err();
    assert!(matches!(err, SemdexError::InvalidArgument(_)));

    // Nothing was removed
    assert_eq!(services.pipeline.list_sources().await.unwrap().len(), 3);

    let removed = services.pipeline.remove_all(true).await.unwrap();
    assert!(removed >= 4);
    assert!(services.pipeline.list_sources().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reindexing_same_tree_is_idempotent_for_sources() {
    let dir = fixture();
    let services = create_test_services(dir.path());

    services.pipeline.index(".").await.unwrap();
    let first = services.pipeline.list_sources().await.unwrap();

    services.pipeline.index(".").await.unwrap();
    let second = services.pipeline.list_sources().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_index_subdirectory_keeps_root_relative_paths() {
    let dir = fixture();
    let services = create_test_services(dir.path());

    services.pipeline.index("src").await.unwrap();

    let sources = services.pipeline.list_sources().await.unwrap();
    assert_eq!(sources, vec!["src/main.rs".to_string()]);
}
