//! Error types for Fala.

use thiserror::Error;

/// Library-level error type for Fala operations.
///
/// Every pipeline stage maps its failures onto exactly one variant; the
/// orchestrator treats all of them as fatal for the job (no retries).
#[derive(Error, Debug)]
pub enum FalaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pergunta ou URL do vídeo não fornecida")]
    Validation,

    #[error("Audio acquisition failed: {0}")]
    Acquisition(String),

    #[error("Audio transcoding failed: {0}")]
    Transcode(String),

    #[error("Staging to object storage failed: {0}")]
    Staging(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Transcription did not complete within {0} seconds")]
    TranscriptionTimeout(u64),

    #[error("Summarization failed (status {status}): {message}")]
    Summarization { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

/// Result type alias for Fala operations.
pub type Result<T> = std::result::Result<T, FalaError>;
