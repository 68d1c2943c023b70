pub mod ollama;
pub mod similarity;

pub use ollama::OllamaEmbedder;
pub use similarity::cosine_similarity;

use synonymizer_core::{CoreError, Embedding};

/// A model that maps text to a fixed-length vector.
pub trait Embedder {
    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, CoreError>;
}
