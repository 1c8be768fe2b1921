//! Fala - Video Question Answering over Spoken Content
//!
//! Given a video URL and a natural-language question, Fala downloads the
//! video's audio, transcodes it to canonical mono 16 kHz PCM, stages it in
//! object storage, transcribes it with a long-running speech-recognition
//! service, and derives an answer from the transcript.
//!
//! The name "Fala" is the Portuguese word for "speech."
//!
//! # Overview
//!
//! Fala answers two kinds of questions:
//! - The reserved question `"resumo"` produces a chunked summary of the
//!   transcript via a hosted summarization model.
//! - Any other question is resolved against a small rule table over the
//!   transcript (word count, full transcript, opening words).
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and credential management
//! - `job` - Per-request job identity and artifact namespace
//! - `audio` - Audio acquisition (yt-dlp) and transcoding (ffmpeg)
//! - `storage` - Object storage staging
//! - `transcription` - Long-running speech-to-text transcription
//! - `chunking` - Bounded-word transcript chunking
//! - `summarize` - Hosted summarization
//! - `answer` - Rule-table question answering
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use fala::config::{Credentials, Settings};
//! use fala::job::Job;
//! use fala::orchestrator::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env()?;
//!     let pipeline = Pipeline::new(settings, credentials)?;
//!
//!     let job = Job::new(
//!         "https://example.com/video".into(),
//!         "quantas palavras tem o vídeo".into(),
//!         None,
//!     );
//!     let outcome = pipeline.run(&job).await?;
//!     println!("{}", outcome.resposta);
//!
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod audio;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod storage;
pub mod summarize;
pub mod transcription;

pub use error::{FalaError, Result};
