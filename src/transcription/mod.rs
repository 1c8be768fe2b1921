//! Transcription module for Fala.
//!
//! Submits staged audio to a long-running speech-recognition service and
//! assembles the ordered transcript text.

mod google;
mod models;

pub use google::GoogleSpeechTranscriber;
pub use models::Transcript;

use crate::error::Result;
use crate::storage::StagedObject;
use async_trait::async_trait;

/// Trait for long-running transcription services.
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe a staged artifact. An empty transcript is a valid
    /// outcome (no recognized speech), not an error.
    async fn transcribe(
        &self,
        staged: &StagedObject,
        sample_rate_hz: u32,
        language_code: &str,
    ) -> Result<Transcript>;
}
