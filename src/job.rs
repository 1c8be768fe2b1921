//! Per-request job identity and artifact namespace.
//!
//! Every inbound question becomes one [`Job`] with a generated uuid. All
//! intermediate artifacts (downloaded audio, canonical WAV, storage object
//! key) are derived from that uuid, so concurrent jobs never observe each
//! other's files or objects.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One end-to-end request to answer a question about one video.
///
/// Immutable after construction; discarded once the response is produced.
#[derive(Debug, Clone)]
pub struct Job {
    /// Generated identifier scoping every artifact of this job.
    pub id: Uuid,
    /// Source video URL.
    pub video_url: String,
    /// Raw question text.
    pub question: String,
    /// Recognition language.
    pub language_code: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job. `language_code` defaults to `pt-BR`.
    pub fn new(video_url: String, question: String, language_code: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            video_url,
            question,
            language_code: language_code.unwrap_or_else(|| "pt-BR".to_string()),
            created_at: Utc::now(),
        }
    }

    /// Derive the job's local artifact namespace under `temp_dir`.
    pub fn workspace(&self, temp_dir: &Path) -> JobWorkspace {
        JobWorkspace {
            id: self.id,
            dir: temp_dir.join(self.id.to_string()),
        }
    }
}

/// Job-scoped directory owning all local intermediate artifacts.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    id: Uuid,
    dir: PathBuf,
}

impl JobWorkspace {
    /// The owning job's id.
    pub fn job_id(&self) -> Uuid {
        self.id
    }

    /// Directory holding this job's artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output template handed to yt-dlp (extension chosen by the downloader).
    pub fn raw_audio_template(&self) -> PathBuf {
        self.dir.join("source.%(ext)s")
    }

    /// File-stem of the acquired artifact, used to locate it after download.
    pub fn raw_audio_stem(&self) -> &'static str {
        "source"
    }

    /// Path of the canonical mono PCM artifact.
    pub fn canonical_wav(&self) -> PathBuf {
        self.dir.join("canonical.wav")
    }

    /// Storage object key for the staged artifact, scoped by job id.
    pub fn object_key(&self, prefix: &str) -> String {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            // No leading separator: GCS would file the object under a
            // pseudo-folder with an empty name.
            format!("{}.wav", self.id)
        } else {
            format!("{}/{}.wav", prefix, self.id)
        }
    }

    /// Create the workspace directory.
    pub fn create(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Best-effort removal of the workspace and everything in it.
    pub fn remove(&self) -> std::io::Result<()> {
        std::fs::remove_dir_all(&self.dir)
    }
}
