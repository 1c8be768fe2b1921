//! Canonical-format transcoding via ffmpeg.

use crate::error::{FalaError, Result};
use crate::job::JobWorkspace;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Converts an arbitrary audio artifact into mono PCM16 WAV at a fixed rate.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode `input` into the workspace's canonical WAV path and
    /// return that path. CPU-bound; no network access.
    async fn transcode(&self, input: &Path, workspace: &JobWorkspace) -> Result<PathBuf>;
}

/// ffmpeg-based transcoder.
pub struct FfmpegTranscoder {
    sample_rate_hz: u32,
}

impl FfmpegTranscoder {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self { sample_rate_hz }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new(16_000)
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[instrument(skip(self, workspace), fields(input = %input.display()))]
    async fn transcode(&self, input: &Path, workspace: &JobWorkspace) -> Result<PathBuf> {
        let dest = workspace.canonical_wav();
        debug!("Transcoding {:?} to mono {} Hz WAV", input, self.sample_rate_hz);

        let result = Command::new("ffmpeg")
            .arg("-i").arg(input)
            .arg("-vn")
            .arg("-ac").arg("1")
            .arg("-ar").arg(self.sample_rate_hz.to_string())
            .arg("-c:a").arg("pcm_s16le")
            .arg("-y")
            .arg("-loglevel").arg("error")
            .arg(&dest)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => Ok(dest),
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(FalaError::Transcode(format!("ffmpeg failed: {err}")))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FalaError::ToolNotFound("ffmpeg".into()))
            }
            Err(e) => Err(FalaError::Transcode(format!("ffmpeg error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;

    #[tokio::test]
    async fn test_undecodable_input_is_transcode_error() {
        let temp = tempfile::tempdir().unwrap();
        let job = Job::new("https://example/a".into(), "resumo".into(), None);
        let ws = job.workspace(temp.path());
        ws.create().unwrap();

        let bogus = ws.dir().join("source.m4a");
        std::fs::write(&bogus, b"not audio").unwrap();

        let transcoder = FfmpegTranscoder::default();
        match transcoder.transcode(&bogus, &ws).await {
            Err(FalaError::Transcode(_)) | Err(FalaError::ToolNotFound(_)) => {}
            other => panic!("expected transcode failure, got {:?}", other.map(|p| p.display().to_string())),
        }
    }
}
