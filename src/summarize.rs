//! Chunked summarization via a hosted model.
//!
//! Each transcript chunk is submitted to the inference endpoint in order,
//! strictly sequentially; the final summary is the space-join of the
//! per-chunk summaries. Any non-success chunk aborts the whole
//! summarization and discards earlier partial summaries.

use crate::chunking::word_chunks;
use crate::error::{FalaError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Per-chunk request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Produces a condensed version of transcript text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Hosted summarization model behind a bearer-token REST endpoint.
pub struct HostedSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    token: String,
    chunk_word_limit: usize,
}

impl HostedSummarizer {
    pub fn new(endpoint: &str, model: &str, token: &str, chunk_word_limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            token: token.to_string(),
            chunk_word_limit,
        })
    }

    /// Summarize one chunk.
    async fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        let url = format!("{}/models/{}", self.endpoint, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "inputs": chunk }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FalaError::Summarization {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: Vec<SummaryItem> = response.json().await.map_err(|e| {
            FalaError::Summarization {
                status: status.as_u16(),
                message: format!("parse response: {e}"),
            }
        })?;

        let summary = parsed
            .first()
            .map(|s| s.summary_text.trim().to_string())
            .unwrap_or_default();

        Ok(summary)
    }
}

#[async_trait]
impl Summarizer for HostedSummarizer {
    #[instrument(skip_all, fields(words = text.split_whitespace().count()))]
    async fn summarize(&self, text: &str) -> Result<String> {
        let mut partials = Vec::new();

        // Strictly sequential: each chunk awaits before the next is sent.
        for (idx, chunk) in word_chunks(text, self.chunk_word_limit).enumerate() {
            debug!("Summarizing chunk {}", idx);
            let summary = self.summarize_chunk(&chunk).await?;
            if !summary.is_empty() {
                partials.push(summary);
            }
        }

        info!(chunks = partials.len(), "Summarization complete");
        Ok(partials.join(" "))
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    #[serde(default)]
    summary_text: String,
}
