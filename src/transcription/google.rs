//! Google Cloud Speech-to-Text transcription implementation.
//!
//! Uses the REST `speech:longrunningrecognize` operation: submit the
//! staged URI, then poll the returned operation until it reports done or
//! the configured bound elapses.

use super::{SpeechTranscriber, Transcript};
use crate::error::{FalaError, Result};
use crate::storage::StagedObject;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Per-request timeout for submit/poll HTTP calls, not the operation wait.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Google Speech-to-Text transcriber.
pub struct GoogleSpeechTranscriber {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl GoogleSpeechTranscriber {
    pub fn new(
        endpoint: &str,
        token: &str,
        timeout_seconds: u64,
        poll_interval_seconds: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout: Duration::from_secs(timeout_seconds),
            poll_interval: Duration::from_secs(poll_interval_seconds.max(1)),
        })
    }

    /// Submit the long-running recognition request, returning the
    /// operation name to poll.
    async fn submit(
        &self,
        staged: &StagedObject,
        sample_rate_hz: u32,
        language_code: &str,
    ) -> Result<String> {
        let body = json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": sample_rate_hz,
                "languageCode": language_code,
            },
            "audio": { "uri": staged.uri() },
        });

        let url = format!("{}/v1/speech:longrunningrecognize", self.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| FalaError::Transcription(format!("submit request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FalaError::Transcription(format!(
                "submit status {}: {}",
                status, body
            )));
        }

        let submitted: OperationHandle = response
            .json()
            .await
            .map_err(|e| FalaError::Transcription(format!("parse submit response: {e}")))?;

        debug!("Recognition operation {} submitted", submitted.name);
        Ok(submitted.name)
    }

    /// Fetch the operation's current state.
    async fn poll(&self, operation_name: &str) -> Result<Operation> {
        let url = format!("{}/v1/operations/{}", self.endpoint, operation_name);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| FalaError::Transcription(format!("poll request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FalaError::Transcription(format!(
                "poll status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FalaError::Transcription(format!("parse operation: {e}")))
    }
}

#[async_trait]
impl SpeechTranscriber for GoogleSpeechTranscriber {
    #[instrument(skip(self, staged), fields(uri = %staged.uri(), language = %language_code))]
    async fn transcribe(
        &self,
        staged: &StagedObject,
        sample_rate_hz: u32,
        language_code: &str,
    ) -> Result<Transcript> {
        let operation = self.submit(staged, sample_rate_hz, language_code).await?;

        let transcript = wait_for_completion(
            || self.poll(&operation),
            self.timeout,
            self.poll_interval,
        )
        .await?;

        info!(
            segments = transcript.segments.len(),
            "Transcription complete"
        );
        Ok(transcript)
    }
}

/// Poll an operation until it reports done, bounded by `timeout`.
///
/// Partial results accumulated by the service are discarded on timeout;
/// the job fails outright.
async fn wait_for_completion<F, Fut>(
    mut poll: F,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Transcript>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<Operation>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        let state = poll().await?;

        if state.done {
            if let Some(err) = state.error {
                return Err(FalaError::Transcription(format!(
                    "service error {}: {}",
                    err.code, err.message
                )));
            }

            let response = state.response.unwrap_or_default();
            return Ok(collect_transcript(&response));
        }

        if Instant::now() + poll_interval > deadline {
            return Err(FalaError::TranscriptionTimeout(timeout.as_secs()));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

// === Wire types ===

#[derive(Debug, Deserialize)]
struct OperationHandle {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<RecognizeResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

/// Assemble the transcript from the top alternative of each result, in
/// service order.
fn collect_transcript(response: &RecognizeResponse) -> Transcript {
    let segments = response
        .results
        .iter()
        .filter_map(|r| r.alternatives.first())
        .map(|a| a.transcript.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Transcript::new(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_transcript_preserves_service_order() {
        let response: RecognizeResponse = serde_json::from_value(json!({
            "results": [
                { "alternatives": [{ "transcript": " um dois " }, { "transcript": "ignored" }] },
                { "alternatives": [{ "transcript": "três" }] },
                { "alternatives": [] },
                { "alternatives": [{ "transcript": "quatro" }] },
            ]
        }))
        .unwrap();

        let transcript = collect_transcript(&response);
        assert_eq!(transcript.text(), "um dois três quatro");
    }

    #[test]
    fn test_collect_transcript_empty_response_is_empty_transcript() {
        let transcript = collect_transcript(&RecognizeResponse::default());
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_never_done_operation_times_out() {
        // An operation that never reports done must end in a timeout,
        // discarding whatever the service has accumulated.
        let result = wait_for_completion(
            || async {
                Ok::<_, FalaError>(Operation {
                    done: false,
                    error: None,
                    response: None,
                })
            },
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .await;

        assert!(matches!(result, Err(FalaError::TranscriptionTimeout(_))));
    }

    #[tokio::test]
    async fn test_done_operation_yields_transcript_within_bound() {
        let transcript = wait_for_completion(
            || async {
                Ok::<_, FalaError>(serde_json::from_value::<Operation>(json!({
                    "done": true,
                    "response": {
                        "results": [
                            { "alternatives": [{ "transcript": "um dois" }] }
                        ]
                    }
                }))
                .unwrap())
            },
            Duration::from_secs(1),
            Duration::from_millis(10),
        )
        .await
        .unwrap();

        assert_eq!(transcript.text(), "um dois");
    }

    #[tokio::test]
    async fn test_done_operation_with_error_is_transcription_error() {
        let result = wait_for_completion(
            || async {
                Ok::<_, FalaError>(serde_json::from_value::<Operation>(json!({
                    "done": true,
                    "error": { "code": 8, "message": "quota exceeded" }
                }))
                .unwrap())
            },
            Duration::from_secs(1),
            Duration::from_millis(10),
        )
        .await;

        match result {
            Err(FalaError::Transcription(msg)) => assert!(msg.contains("quota exceeded")),
            other => panic!("expected transcription error, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_operation_error_parses() {
        let op: Operation = serde_json::from_value(json!({
            "done": true,
            "error": { "code": 3, "message": "unsupported language" }
        }))
        .unwrap();
        assert!(op.done);
        assert_eq!(op.error.unwrap().message, "unsupported language");
    }
}
