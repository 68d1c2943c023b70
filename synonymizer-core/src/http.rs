//! JSON-over-HTTP transport shared by the Ollama-backed capabilities.

use crate::config::OllamaConfig;
use crate::error::{CoreError, TransportError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct OllamaHttp {
    http_client: Client,
    base_url: Url,
}

impl OllamaHttp {
    pub fn new(config: &OllamaConfig) -> Result<Self, CoreError> {
        let base_url = config.base_url()?;
        let http_client = Client::builder()
            .user_agent(concat!("synonymizer/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host string used in diagnostics, without a trailing slash.
    pub fn host(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::Unreachable {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })?;
        let start_time = Instant::now();

        debug!("POST {}", url);
        let response = self
            .http_client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for POST {}: {}", url, e);
                if e.is_timeout() {
                    TransportError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    TransportError::Unreachable {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            error!("Request failed with status: {} for {}", status, url);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response.json::<R>().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransportError::Decode {
                    reason: e.to_string(),
                }
            }
        })?;

        debug!("POST {} completed in {:?}", url, start_time.elapsed());
        Ok(parsed)
    }
}
