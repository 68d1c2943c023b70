//! Chat-style generation against a local Ollama server.

use crate::prompt::Prompt;
use crate::TextGenerator;
use serde::{Deserialize, Serialize};
use synonymizer_core::{CoreError, LlmError, OllamaConfig, OllamaHttp, TransportError};
use tracing::debug;

const CHAT_ENDPOINT: &str = "api/chat";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Debug, Clone)]
pub struct OllamaChatGenerator {
    http: OllamaHttp,
}

impl OllamaChatGenerator {
    pub fn new(config: &OllamaConfig) -> Result<Self, CoreError> {
        Ok(Self {
            http: OllamaHttp::new(config)?,
        })
    }

    pub fn from_http(http: OllamaHttp) -> Self {
        Self { http }
    }

    fn map_transport_error(&self, error: TransportError, model: &str) -> LlmError {
        match error {
            TransportError::Unreachable { reason, .. } => LlmError::ServiceUnavailable {
                host: self.http.host(),
                reason,
            },
            TransportError::Timeout { .. } => LlmError::RequestTimeout {
                model: model.to_string(),
            },
            TransportError::Status { status: 404, .. } => LlmError::ModelNotAvailable {
                model: model.to_string(),
            },
            TransportError::Status { status, message } if status >= 500 => {
                LlmError::ServerError { status, message }
            }
            TransportError::Status { status, message } => {
                LlmError::RequestRejected { status, message }
            }
            TransportError::Decode { reason } => {
                LlmError::InvalidResponseFormat { details: reason }
            }
        }
    }
}

impl TextGenerator for OllamaChatGenerator {
    async fn generate(&self, model: &str, prompt: &Prompt) -> Result<String, CoreError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        debug!("Requesting chat completion from model {}", model);
        let response: ChatResponse = self
            .http
            .post_json(CHAT_ENDPOINT, &request)
            .await
            .map_err(|e| self.map_transport_error(e, model))?;

        Ok(response.message.content)
    }
}
