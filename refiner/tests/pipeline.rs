use embedding_engine::{Embedder, OllamaEmbedder};
use llm_interface::{OllamaChatGenerator, Prompt, TextGenerator};
use refiner::{RefineRequest, SynonymRefiner};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use synonymizer_core::testing::{CannedResponse, FakeOllama};
use synonymizer_core::{
    CoreError, EmbeddingError, LlmError, OllamaConfig, OllamaHttp, RetryConfig,
};

struct CannedGenerator {
    reply: Result<String, LlmError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl CannedGenerator {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for &CannedGenerator {
    async fn generate(&self, _model: &str, prompt: &Prompt) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply.clone().map_err(CoreError::from)
    }
}

/// Looks vectors up by text and records every text it was asked for.
struct TableEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    failing_text: Option<String>,
    transient_failures: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl TableEmbedder {
    fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: entries
                .iter()
                .map(|(text, v)| (text.to_string(), v.clone()))
                .collect(),
            failing_text: None,
            transient_failures: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, text: &str) -> Self {
        self.failing_text = Some(text.to_string());
        self
    }

    /// The first `count` calls answer with a 503.
    fn flaky(self, count: usize) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Embedder for &TableEmbedder {
    async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>, CoreError> {
        self.requested.lock().unwrap().push(text.to_string());
        let pending = self.transient_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.transient_failures.store(pending - 1, Ordering::SeqCst);
            return Err(EmbeddingError::ServerError {
                status: 503,
                message: "loading model".to_string(),
            }
            .into());
        }
        if self.failing_text.as_deref() == Some(text) {
            return Err(EmbeddingError::RequestRejected {
                status: 400,
                message: format!("cannot embed {text}"),
            }
            .into());
        }
        self.vectors.get(text).cloned().ok_or_else(|| {
            EmbeddingError::InvalidResponse {
                details: format!("no vector for {text}"),
            }
            .into()
        })
    }
}

/// Unit vector whose cosine similarity with `[1, 0]` is `similarity`.
fn at(similarity: f32) -> Vec<f32> {
    vec![similarity, (1.0 - similarity * similarity).sqrt()]
}

fn request(word: &str, threshold: f32) -> RefineRequest {
    RefineRequest {
        word: word.to_string(),
        generation_model: "aya".to_string(),
        embedding_model: "llama3".to_string(),
        desired_count: 10,
        threshold,
    }
}

fn arabic_fixture() -> (CannedGenerator, TableEmbedder) {
    let generator = CannedGenerator::replying("[مبتهج, فرحان, سعيد, مسرور]");
    let embedder = TableEmbedder::new(&[
        ("سعيد", vec![1.0, 0.0]),
        ("مبتهج", at(0.9)),
        ("فرحان", at(0.85)),
        ("مسرور", at(0.5)),
    ]);
    (generator, embedder)
}

#[tokio::test]
async fn test_arabic_scenario() {
    let (generator, embedder) = arabic_fixture();
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let result = refiner.refine(&request("سعيد", 0.8)).await.unwrap();

    assert_eq!(result, vec!["مبتهج", "فرحان"]);
    assert_eq!(generator.calls(), 1);
    assert_eq!(
        embedder.requested(),
        vec!["سعيد", "مبتهج", "فرحان", "مسرور"]
    );
}

#[tokio::test]
async fn test_prompt_carries_word_and_count() {
    let (generator, embedder) = arabic_fixture();
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let mut req = request("سعيد", 0.8);
    req.desired_count = 4;
    refiner.refine(&req).await.unwrap();

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].user.contains("Generate 4 synonyms for سعيد"));
}

#[tokio::test]
async fn test_no_list_skips_embedding() {
    let generator = CannedGenerator::replying("مبتهج، فرحان، مسرور");
    let embedder = TableEmbedder::new(&[]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let result = refiner.refine(&request("سعيد", 0.8)).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(generator.calls(), 1);
    assert!(embedder.requested().is_empty());
}

#[tokio::test]
async fn test_list_of_only_the_word_skips_embedding() {
    let generator = CannedGenerator::replying("[سعيد]");
    let embedder = TableEmbedder::new(&[]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let result = refiner.refine(&request("سعيد", 0.8)).await.unwrap();

    assert!(result.is_empty());
    assert!(embedder.requested().is_empty());
}

#[tokio::test]
async fn test_keeps_reply_order_not_score_order() {
    let generator = CannedGenerator::replying("[a, b, c, d]");
    let embedder = TableEmbedder::new(&[
        ("w", vec![1.0, 0.0]),
        ("a", at(0.3)),
        ("b", at(0.95)),
        ("c", at(0.1)),
        ("d", at(0.85)),
    ]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let result = refiner.refine(&request("w", 0.8)).await.unwrap();
    assert_eq!(result, vec!["b", "d"]);
}

#[tokio::test]
async fn test_threshold_is_inclusive() {
    let generator = CannedGenerator::replying("[same, other]");
    let embedder = TableEmbedder::new(&[
        ("w", vec![1.0, 0.0]),
        ("same", vec![1.0, 0.0]),
        ("other", vec![0.0, 1.0]),
    ]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let result = refiner.refine(&request("w", 1.0)).await.unwrap();
    assert_eq!(result, vec!["same"]);

    let result = refiner.refine(&request("w", 0.0)).await.unwrap();
    assert_eq!(result, vec!["same", "other"]);
}

#[tokio::test]
async fn test_threshold_bounds() {
    let generator = CannedGenerator::replying("[a, b, zero, a]");
    let embedder = TableEmbedder::new(&[
        ("w", vec![1.0, 0.0]),
        ("a", vec![-1.0, 0.0]),
        ("b", vec![1.0, 0.0]),
        ("zero", vec![0.0, 0.0]),
    ]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let everything = refiner.refine(&request("w", -1.0)).await.unwrap();
    assert_eq!(everything, vec!["a", "b", "zero", "a"]);

    let nothing = refiner.refine(&request("w", 1.01)).await.unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn test_identical_inputs_give_identical_outputs() {
    let (generator, embedder) = arabic_fixture();
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let first = refiner.refine_scored(&request("سعيد", 0.8)).await.unwrap();
    let second = refiner.refine_scored(&request("سعيد", 0.8)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert!((first[0].similarity - 0.9).abs() < 1e-5);
    assert!((first[1].similarity - 0.85).abs() < 1e-5);
}

#[tokio::test]
async fn test_scores_cover_every_candidate() {
    let (generator, embedder) = arabic_fixture();
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let scored = refiner.score_candidates(&request("سعيد", 0.8)).await.unwrap();
    let names: Vec<&str> = scored.iter().map(|s| s.candidate.as_str()).collect();
    assert_eq!(names, vec!["مبتهج", "فرحان", "مسرور"]);
}

#[tokio::test]
async fn test_embedding_failure_fails_whole_call() {
    let generator = CannedGenerator::replying("[a, b, c]");
    let embedder = TableEmbedder::new(&[
        ("w", vec![1.0, 0.0]),
        ("a", vec![1.0, 0.0]),
        ("c", vec![1.0, 0.0]),
    ])
    .failing_on("b");
    let refiner = SynonymRefiner::new(&generator, &embedder).with_retry(RetryConfig::disabled());

    let err = refiner.refine(&request("w", 0.5)).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Embedding(EmbeddingError::RequestRejected { status: 400, .. })
    ));
    assert_eq!(embedder.requested(), vec!["w", "a", "b"]);
}

#[tokio::test]
async fn test_dimension_mismatch_is_reported() {
    let generator = CannedGenerator::replying("[a]");
    let embedder = TableEmbedder::new(&[("w", vec![1.0, 0.0]), ("a", vec![1.0, 0.0, 0.0])]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let err = refiner.refine(&request("w", 0.5)).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Embedding(EmbeddingError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[tokio::test]
async fn test_generation_failure_is_not_retried() {
    let generator = CannedGenerator::failing(LlmError::ServerError {
        status: 500,
        message: "model failed to load".to_string(),
    });
    let embedder = TableEmbedder::new(&[]);
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let err = refiner.refine(&request("w", 0.5)).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Llm(LlmError::ServerError { status: 500, .. })
    ));
    assert_eq!(generator.calls(), 1);
    assert!(embedder.requested().is_empty());
}

#[tokio::test]
async fn test_transient_embedding_failure_is_retried() {
    let generator = CannedGenerator::replying("[a]");
    let embedder =
        TableEmbedder::new(&[("w", vec![1.0, 0.0]), ("a", vec![1.0, 0.0])]).flaky(2);
    let refiner = SynonymRefiner::new(&generator, &embedder).with_retry(RetryConfig {
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay_ms: 5,
        backoff_multiplier: 2.0,
        jitter_factor: 0.0,
    });

    let kept = refiner.refine(&request("w", 0.5)).await.unwrap();

    assert_eq!(kept, vec!["a"]);
    assert_eq!(embedder.requested(), vec!["w", "w", "w", "a"]);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_invalid_requests_never_reach_the_model() {
    let (generator, embedder) = arabic_fixture();
    let refiner = SynonymRefiner::new(&generator, &embedder);

    let mut zero_count = request("سعيد", 0.8);
    zero_count.desired_count = 0;
    assert!(matches!(
        refiner.refine(&zero_count).await,
        Err(CoreError::InvalidInput { .. })
    ));

    assert!(matches!(
        refiner.refine(&request("   ", 0.8)).await,
        Err(CoreError::InvalidInput { .. })
    ));

    assert!(matches!(
        refiner.refine(&request("سعيد", f32::NAN)).await,
        Err(CoreError::InvalidInput { .. })
    ));

    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_end_to_end_against_fake_ollama() {
    let server = FakeOllama::start(|request| match request.path.as_str() {
        "/api/chat" => CannedResponse::json(json!({
            "message": {
                "role": "assistant",
                "content": "Here you go: [مبتهج, فرحان, سعيد, مسرور]"
            },
            "done": true
        })),
        "/api/embeddings" => {
            let vector = match request.body["prompt"].as_str() {
                Some("سعيد") => json!([1.0, 0.0]),
                Some("مبتهج") => json!([0.9, 0.435_889_9]),
                Some("فرحان") => json!([0.85, 0.526_782_7]),
                _ => json!([0.5, 0.866_025_4]),
            };
            CannedResponse::json(json!({ "embedding": vector }))
        }
        _ => CannedResponse::error(404, "not found"),
    })
    .await
    .unwrap();

    let http = OllamaHttp::new(&OllamaConfig {
        host: server.host(),
        request_timeout_secs: 5,
    })
    .unwrap();
    let refiner = SynonymRefiner::new(
        OllamaChatGenerator::from_http(http.clone()),
        OllamaEmbedder::from_http(http),
    )
    .with_retry(RetryConfig::disabled());

    let result = refiner.refine(&request("سعيد", 0.8)).await.unwrap();
    assert_eq!(result, vec!["مبتهج", "فرحان"]);

    let paths: Vec<String> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "/api/chat",
            "/api/embeddings",
            "/api/embeddings",
            "/api/embeddings",
            "/api/embeddings"
        ]
    );
}
