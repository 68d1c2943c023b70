//! Embeddings from a local Ollama server, one text per request.

use crate::Embedder;
use serde::{Deserialize, Serialize};
use synonymizer_core::{
    CoreError, Embedding, EmbeddingError, OllamaConfig, OllamaHttp, TransportError,
};
use tracing::debug;

const EMBEDDINGS_ENDPOINT: &str = "api/embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    http: OllamaHttp,
}

impl OllamaEmbedder {
    pub fn new(config: &OllamaConfig) -> Result<Self, CoreError> {
        Ok(Self {
            http: OllamaHttp::new(config)?,
        })
    }

    pub fn from_http(http: OllamaHttp) -> Self {
        Self { http }
    }

    fn map_transport_error(&self, error: TransportError, model: &str) -> EmbeddingError {
        match error {
            TransportError::Unreachable { reason, .. } => EmbeddingError::ServiceUnavailable {
                host: self.http.host(),
                reason,
            },
            TransportError::Timeout { .. } => EmbeddingError::RequestTimeout {
                model: model.to_string(),
            },
            TransportError::Status { status: 404, .. } => EmbeddingError::ModelNotFound {
                model_name: model.to_string(),
            },
            TransportError::Status { status, message } if status >= 500 => {
                EmbeddingError::ServerError { status, message }
            }
            TransportError::Status { status, message } => {
                EmbeddingError::RequestRejected { status, message }
            }
            TransportError::Decode { reason } => {
                EmbeddingError::InvalidResponse { details: reason }
            }
        }
    }
}

impl Embedder for OllamaEmbedder {
    async fn embed(&self, model: &str, text: &str) -> Result<Embedding, CoreError> {
        let request = EmbeddingRequest {
            model,
            prompt: text,
        };

        let response: EmbeddingResponse = self
            .http
            .post_json(EMBEDDINGS_ENDPOINT, &request)
            .await
            .map_err(|e| self.map_transport_error(e, model))?;

        if response.embedding.is_empty() {
            return Err(EmbeddingError::EmptyEmbedding {
                model: model.to_string(),
                text: text.to_string(),
            }
            .into());
        }

        debug!(
            "Embedded {:?} with {} ({} dimensions)",
            text,
            model,
            response.embedding.len()
        );
        Ok(response.embedding)
    }
}
