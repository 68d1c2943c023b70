use serde::Serialize;

/// A word's vector representation as returned by the embedding model.
pub type Embedding = Vec<f32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub word: String,
    pub model: String,
    pub desired_count: usize,
}

impl GenerationRequest {
    pub fn new(word: impl Into<String>, model: impl Into<String>, desired_count: usize) -> Self {
        Self {
            word: word.into(),
            model: model.into(),
            desired_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: String,
    pub similarity: f32,
}

impl ScoredCandidate {
    pub fn meets(&self, threshold: f32) -> bool {
        self.similarity >= threshold
    }
}
