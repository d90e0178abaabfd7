// Common test utilities and fixtures

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use semdex::core::config::Config;
use semdex::core::embed::Embedder;
use semdex::core::error::Result;
use semdex::core::services::Services;
use semdex::core::store::MemoryStore;

/// Deterministic embedder for tests: the vector is a coarse bag-of-
/// characters histogram, so identical text embeds identically and
/// similar text lands nearby. No network involved.
pub struct MockEmbedder;

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut histogram = [0.0f32; 26];
        for c in text.to_lowercase().chars() {
            if c.is_ascii_lowercase() {
                histogram[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        Ok(histogram.to_vec())
    }
}

/// Services wired to the mock embedder and an in-memory store,
/// rooted at a test directory.
#[allow(dead_code)]
pub fn create_test_services(root: &Path) -> Arc<Services> {
    let mut config = Config::default();
    config.store.backend = "memory".to_string();
    config.indexing.auto_index = false;

    Arc::new(Services::with_backends(
        config,
        root.to_path_buf(),
        Arc::new(MockEmbedder),
        Arc::new(MemoryStore::new()),
    ))
}
