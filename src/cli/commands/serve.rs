//! HTTP API server.
//!
//! Exposes the acquisition-to-answer pipeline as a single JSON endpoint.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::job::Job;
use crate::orchestrator::Pipeline;
use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    pipeline: Pipeline,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    // Credentials are loaded once, before any request is served.
    let credentials = match preflight::check() {
        Ok(c) => c,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'fala doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let pipeline = Pipeline::new(settings, credentials)?;
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Fala API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Pergunta", "POST /pergunta");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/pergunta", post(pergunta))
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
struct PerguntaRequest {
    video_url: Option<String>,
    /// The question; "question" is accepted as an alias.
    #[serde(alias = "question")]
    pergunta: Option<String>,
    language_code: Option<String>,
}

#[derive(Serialize)]
struct PerguntaResponse {
    transcricao: String,
    resposta: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    erro: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn pergunta(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PerguntaRequest>, JsonRejection>,
) -> impl IntoResponse {
    // The caller always receives a JSON object, including on bodies that
    // never parsed; axum's plain-text rejection must not leak through.
    let Ok(Json(req)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                erro: crate::error::FalaError::Validation.to_string(),
            }),
        )
            .into_response();
    };

    // Validation happens before any pipeline stage runs.
    let (video_url, question) = match (
        req.video_url.filter(|u| !u.trim().is_empty()),
        req.pergunta.filter(|p| !p.trim().is_empty()),
    ) {
        (Some(url), Some(q)) => (url, q),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    erro: crate::error::FalaError::Validation.to_string(),
                }),
            )
                .into_response();
        }
    };

    let job = Job::new(video_url, question, req.language_code);

    match state.pipeline.run(&job).await {
        Ok(outcome) => Json(PerguntaResponse {
            transcricao: outcome.transcript.text(),
            resposta: outcome.resposta,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                erro: e.to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioAcquirer, Transcoder};
    use crate::error::{FalaError, Result};
    use crate::job::JobWorkspace;
    use crate::storage::{ObjectStager, StagedObject};
    use crate::summarize::Summarizer;
    use crate::transcription::{SpeechTranscriber, Transcript};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    struct TrackingAcquirer {
        invoked: Arc<AtomicBool>,
        fail: bool,
    }

    #[async_trait]
    impl AudioAcquirer for TrackingAcquirer {
        async fn acquire(&self, _url: &str, workspace: &JobWorkspace) -> Result<PathBuf> {
            self.invoked.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(FalaError::Acquisition("unreachable URL".into()));
            }
            workspace.create()?;
            let path = workspace.dir().join("source.m4a");
            std::fs::write(&path, b"raw")?;
            Ok(path)
        }
    }

    struct NoopTranscoder;

    #[async_trait]
    impl Transcoder for NoopTranscoder {
        async fn transcode(&self, _input: &Path, workspace: &JobWorkspace) -> Result<PathBuf> {
            let path = workspace.canonical_wav();
            std::fs::write(&path, b"wav")?;
            Ok(path)
        }
    }

    struct NoopStager;

    #[async_trait]
    impl ObjectStager for NoopStager {
        async fn stage(&self, _path: &Path, object_key: &str) -> Result<StagedObject> {
            Ok(StagedObject {
                bucket: "test".into(),
                object_key: object_key.to_string(),
            })
        }
    }

    struct FixedTranscriber;

    #[async_trait]
    impl SpeechTranscriber for FixedTranscriber {
        async fn transcribe(
            &self,
            _staged: &StagedObject,
            _sample_rate_hz: u32,
            _language_code: &str,
        ) -> Result<Transcript> {
            Ok(Transcript::new(vec!["um dois três quatro".into()]))
        }
    }

    struct NoopSummarizer;

    #[async_trait]
    impl Summarizer for NoopSummarizer {
        async fn summarize(&self, _text: &str) -> Result<String> {
            Ok("resumo".into())
        }
    }

    fn test_app(fail_acquisition: bool, temp: &Path) -> (Router, Arc<AtomicBool>) {
        let mut settings = Settings::default();
        settings.general.temp_dir = temp.to_string_lossy().into_owned();

        let invoked = Arc::new(AtomicBool::new(false));
        let pipeline = Pipeline::with_components(
            settings,
            Arc::new(TrackingAcquirer {
                invoked: invoked.clone(),
                fail: fail_acquisition,
            }),
            Arc::new(NoopTranscoder),
            Arc::new(NoopStager),
            Arc::new(FixedTranscriber),
            Arc::new(NoopSummarizer),
        )
        .unwrap();

        (router(Arc::new(AppState { pipeline })), invoked)
    }

    async fn post_pergunta(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pergunta")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_malformed_body_still_gets_json_envelope() {
        let temp = tempfile::tempdir().unwrap();
        let (app, invoked) = test_app(false, temp.path());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pergunta")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["erro"], "Pergunta ou URL do vídeo não fornecida");
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_before_pipeline() {
        let temp = tempfile::tempdir().unwrap();
        let (app, invoked) = test_app(false, temp.path());

        let (status, body) = post_pergunta(
            app,
            serde_json::json!({ "video_url": "https://example/video" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["erro"], "Pergunta ou URL do vídeo não fornecida");
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_fields_count_as_missing() {
        let temp = tempfile::tempdir().unwrap();
        let (app, invoked) = test_app(false, temp.path());

        let (status, body) = post_pergunta(
            app,
            serde_json::json!({ "video_url": "  ", "pergunta": "resumo" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["erro"], "Pergunta ou URL do vídeo não fornecida");
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_word_count_scenario() {
        let temp = tempfile::tempdir().unwrap();
        let (app, _) = test_app(false, temp.path());

        let (status, body) = post_pergunta(
            app,
            serde_json::json!({
                "video_url": "https://example/video",
                "pergunta": "quantas palavras tem o vídeo",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resposta"], "A transcrição contém 4 palavras.");
        assert_eq!(body["transcricao"], "um dois três quatro");
    }

    #[tokio::test]
    async fn test_question_alias_is_accepted() {
        let temp = tempfile::tempdir().unwrap();
        let (app, _) = test_app(false, temp.path());

        let (status, _) = post_pergunta(
            app,
            serde_json::json!({
                "video_url": "https://example/video",
                "question": "quantas palavras tem o vídeo",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_acquisition_failure_returns_500_with_message() {
        let temp = tempfile::tempdir().unwrap();
        let (app, _) = test_app(true, temp.path());

        let (status, body) = post_pergunta(
            app,
            serde_json::json!({
                "video_url": "https://example/missing",
                "pergunta": "resumo",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let erro = body["erro"].as_str().unwrap();
        assert!(!erro.is_empty());
        assert!(erro.contains("unreachable URL"));
    }
}
