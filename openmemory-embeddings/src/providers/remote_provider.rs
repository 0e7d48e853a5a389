//! Remote HTTP embedding provider.
//!
//! OpenAI-compatible embeddings endpoint client with retry and exponential
//! backoff. Marks itself unavailable after exhausting retries so the
//! degradation chain stops paying the round-trip cost on every call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult};
use openmemory_core::traits::Embedder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub struct RemoteProvider {
    model: String,
    api_key: String,
    endpoint: String,
    dimensions: usize,
    available: AtomicBool,
    max_retries: u32,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl RemoteProvider {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>, endpoint: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            dimensions,
            available: AtomicBool::new(true),
            max_retries: 3,
            client: reqwest::blocking::Client::new(),
        }
    }

    fn request_embeddings(&self, texts: Vec<String>) -> OpenMemoryResult<Vec<Vec<f32>>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(OpenMemoryError::unavailable(format!("{} marked unavailable", self.name())));
        }

        let body = EmbedRequest { model: self.model.clone(), input: texts };

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying remote embedding request");
            }

            match self.send_request(&body) {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) => {
                    warn!(attempt, error = %e, "remote embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        self.available.store(false, Ordering::Relaxed);
        Err(last_err.unwrap_or_else(|| OpenMemoryError::internal("all retries exhausted".to_string())))
    }

    fn send_request(&self, body: &EmbedRequest) -> OpenMemoryResult<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| OpenMemoryError::internal(format!("HTTP error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(OpenMemoryError::unavailable(format!("API returned {status}: {text}")));
        }

        let resp: EmbedResponse =
            response.json().map_err(|e| OpenMemoryError::internal(format!("JSON parse error: {e}")))?;

        let dims = self.dimensions;
        Ok(resp
            .data
            .into_iter()
            .map(|d| {
                let mut v = d.embedding;
                v.resize(dims, 0.0);
                v
            })
            .collect())
    }

    pub fn reset_availability(&self) {
        self.available.store(true, Ordering::Relaxed);
    }
}

impl Embedder for RemoteProvider {
    fn embed(&self, text: &str) -> OpenMemoryResult<Vec<f32>> {
        let results = self.request_embeddings(vec![text.to_string()])?;
        results.into_iter().next().ok_or_else(|| OpenMemoryError::internal("empty response".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> OpenMemoryResult<Vec<Vec<f32>>> {
        self.request_embeddings(texts.to_vec())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
