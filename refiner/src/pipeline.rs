use crate::parse::extract_candidates;
use embedding_engine::{cosine_similarity, Embedder};
use llm_interface::{build_prompt, PromptOptions, TextGenerator};
use synonymizer_core::{
    AppConfig, CoreError, GenerationRequest, RetryConfig, RetryExecutor, ScoredCandidate,
};
use tracing::{debug, info};

/// Everything `refine` needs for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineRequest {
    pub word: String,
    pub generation_model: String,
    pub embedding_model: String,
    pub desired_count: usize,
    pub threshold: f32,
}

impl RefineRequest {
    pub fn from_config(word: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            word: word.into(),
            generation_model: config.generation.model.clone(),
            embedding_model: config.embedding.model.clone(),
            desired_count: config.generation.num_synonyms,
            threshold: config.embedding.similarity_threshold,
        }
    }

    pub fn generation(&self) -> GenerationRequest {
        GenerationRequest::new(&self.word, &self.generation_model, self.desired_count)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.word.trim().is_empty() {
            return Err(CoreError::InvalidInput {
                message: "word must not be empty".to_string(),
            });
        }
        if self.desired_count == 0 {
            return Err(CoreError::InvalidInput {
                message: "number of synonyms must be greater than zero".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(CoreError::InvalidInput {
                message: format!("similarity threshold {} is not a number", self.threshold),
            });
        }
        Ok(())
    }
}

/// Generate-then-filter synonym pipeline over injected capabilities.
pub struct SynonymRefiner<G, E> {
    generator: G,
    embedder: E,
    prompt_options: PromptOptions,
    retry: RetryExecutor,
}

impl<G, E> SynonymRefiner<G, E>
where
    G: TextGenerator,
    E: Embedder,
{
    pub fn new(generator: G, embedder: E) -> Self {
        Self {
            generator,
            embedder,
            prompt_options: PromptOptions::default(),
            retry: RetryExecutor::default(),
        }
    }

    pub fn with_prompt_options(mut self, options: PromptOptions) -> Self {
        self.prompt_options = options;
        self
    }

    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config);
        self
    }

    /// Asks the generator for candidates and returns its reply verbatim.
    ///
    /// The call is made exactly once; only embedding requests go through
    /// the retry policy.
    pub async fn request_candidates(&self, request: &GenerationRequest) -> Result<String, CoreError> {
        let prompt = build_prompt(&request.word, request.desired_count, self.prompt_options);
        let raw = self.generator.generate(&request.model, &prompt).await?;

        debug!("Raw reply from {}: {}", request.model, raw);
        Ok(raw)
    }

    /// Scores every extracted candidate against the word, in reply order.
    ///
    /// An empty candidate list returns early without touching the embedder.
    pub async fn score_candidates(
        &self,
        request: &RefineRequest,
    ) -> Result<Vec<ScoredCandidate>, CoreError> {
        request.validate()?;

        let raw = self.request_candidates(&request.generation()).await?;
        let candidates = extract_candidates(&raw, &request.word);
        if candidates.is_empty() {
            info!("No candidates extracted for {}", request.word);
            return Ok(Vec::new());
        }

        let word_embedding = self.embed(&request.embedding_model, &request.word).await?;

        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let embedding = self.embed(&request.embedding_model, &candidate).await?;
            let similarity = cosine_similarity(&word_embedding, &embedding)?;
            debug!("{} ~ {}: {:.4}", request.word, candidate, similarity);
            scored.push(ScoredCandidate {
                candidate,
                similarity,
            });
        }

        Ok(scored)
    }

    /// Like [`refine`](Self::refine) but keeps the similarity scores.
    pub async fn refine_scored(
        &self,
        request: &RefineRequest,
    ) -> Result<Vec<ScoredCandidate>, CoreError> {
        let scored = self.score_candidates(request).await?;
        let total = scored.len();

        let retained: Vec<ScoredCandidate> = scored
            .into_iter()
            .filter(|s| s.meets(request.threshold))
            .collect();

        info!(
            "Kept {}/{} candidates for {} at threshold {}",
            retained.len(),
            total,
            request.word,
            request.threshold
        );
        Ok(retained)
    }

    /// Candidates whose similarity to the word is at least the threshold,
    /// in the order the model produced them.
    pub async fn refine(&self, request: &RefineRequest) -> Result<Vec<String>, CoreError> {
        Ok(self
            .refine_scored(request)
            .await?
            .into_iter()
            .map(|s| s.candidate)
            .collect())
    }

    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, CoreError> {
        self.retry
            .execute("embed", || self.embedder.embed(model, text))
            .await
    }
}
