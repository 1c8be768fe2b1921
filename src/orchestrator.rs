//! Pipeline orchestrator for Fala.
//!
//! Runs one job through the acquisition-to-answer pipeline: acquire →
//! transcode → stage → transcribe → answer. Stages run strictly
//! sequentially; the first failure aborts the job with no compensating
//! actions.

use crate::answer;
use crate::audio::{AudioAcquirer, FfmpegTranscoder, Transcoder, YtDlpAcquirer};
use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::job::Job;
use crate::storage::{GcsStager, ObjectStager};
use crate::summarize::{HostedSummarizer, Summarizer};
use crate::transcription::{GoogleSpeechTranscriber, SpeechTranscriber, Transcript};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    Acquiring,
    Transcoding,
    Staging,
    Transcribing,
    Answering,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::Acquiring => "acquiring",
            Stage::Transcoding => "transcoding",
            Stage::Staging => "staging",
            Stage::Transcribing => "transcribing",
            Stage::Answering => "answering",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// The main pipeline for answering a question about one video.
///
/// Components are stateless after construction and safe to share across
/// concurrent jobs; every mutable artifact lives in the job's workspace.
pub struct Pipeline {
    settings: Settings,
    acquirer: Arc<dyn AudioAcquirer>,
    transcoder: Arc<dyn Transcoder>,
    stager: Arc<dyn ObjectStager>,
    transcriber: Arc<dyn SpeechTranscriber>,
    summarizer: Arc<dyn Summarizer>,
    temp_dir: PathBuf,
}

impl Pipeline {
    /// Create a pipeline with the production components.
    pub fn new(settings: Settings, credentials: Credentials) -> Result<Self> {
        let acquirer = Arc::new(YtDlpAcquirer::new(settings.acquisition.cookie_file.clone()));
        let transcoder = Arc::new(FfmpegTranscoder::new(settings.transcode.sample_rate_hz));

        let stager = Arc::new(GcsStager::new(
            &settings.storage.endpoint,
            &settings.storage.bucket,
            &credentials.google_token,
        )?);

        let transcriber = Arc::new(GoogleSpeechTranscriber::new(
            &settings.transcription.endpoint,
            &credentials.google_token,
            settings.transcription.timeout_seconds,
            settings.transcription.poll_interval_seconds,
        )?);

        let summarizer = Arc::new(HostedSummarizer::new(
            &settings.summarization.endpoint,
            &settings.summarization.model,
            &credentials.summarization_token,
            settings.summarization.chunk_word_limit,
        )?);

        Self::with_components(
            settings, acquirer, transcoder, stager, transcriber, summarizer,
        )
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        acquirer: Arc<dyn AudioAcquirer>,
        transcoder: Arc<dyn Transcoder>,
        stager: Arc<dyn ObjectStager>,
        transcriber: Arc<dyn SpeechTranscriber>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self> {
        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            settings,
            acquirer,
            transcoder,
            stager,
            transcriber,
            summarizer,
            temp_dir,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one job to completion.
    ///
    /// Each stage runs to completion or failure before the next begins.
    /// On failure the job stops where it is; staged objects and workspace
    /// files may be left behind (bucket retention and temp-dir cleanup
    /// are the operator's concern).
    #[instrument(skip(self, job), fields(job_id = %job.id, url = %job.video_url))]
    pub async fn run(&self, job: &Job) -> Result<JobOutcome> {
        let workspace = job.workspace(&self.temp_dir);
        let mut stage = Stage::Created;

        let result = async {
            stage = Stage::Acquiring;
            info!(%stage, "Acquiring audio");
            let raw_audio = self.acquirer.acquire(&job.video_url, &workspace).await?;

            stage = Stage::Transcoding;
            info!(%stage, "Transcoding to canonical format");
            let canonical = self.transcoder.transcode(&raw_audio, &workspace).await?;

            stage = Stage::Staging;
            info!(%stage, "Staging canonical audio");
            let key = workspace.object_key(&self.settings.storage.key_prefix);
            let staged = self.stager.stage(&canonical, &key).await?;

            stage = Stage::Transcribing;
            info!(%stage, "Transcribing staged audio");
            let transcript = self
                .transcriber
                .transcribe(
                    &staged,
                    self.settings.transcode.sample_rate_hz,
                    &job.language_code,
                )
                .await?;

            stage = Stage::Answering;
            info!(%stage, "Answering question");
            let resposta = if answer::is_summary_request(&job.question) {
                self.summarizer.summarize(&transcript.text()).await?
            } else {
                answer::answer(&transcript, &job.question)
            };

            stage = Stage::Done;
            Ok(JobOutcome {
                transcript,
                resposta,
            })
        }
        .await;

        match &result {
            Ok(_) => {
                info!(%stage, "Job complete");
                // Workspace cleanup only on success; failed jobs keep
                // their artifacts for inspection.
                if let Err(e) = workspace.remove() {
                    warn!("Failed to clean up job workspace: {}", e);
                }
            }
            Err(e) => {
                warn!(failed_stage = %stage, error = %e, "Job failed");
            }
        }

        result
    }
}

/// Terminal artifact of a successful job.
#[derive(Debug)]
pub struct JobOutcome {
    /// Full transcript assembled by the transcriber.
    pub transcript: Transcript,
    /// The answer produced for the job's question.
    pub resposta: String,
}
