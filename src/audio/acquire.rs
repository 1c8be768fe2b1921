//! Audio acquisition via yt-dlp.

use crate::error::{FalaError, Result};
use crate::job::JobWorkspace;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Retrieves the audio track of a remote video into a job-scoped location.
#[async_trait]
pub trait AudioAcquirer: Send + Sync {
    /// Download the best available audio for `url` into the workspace and
    /// return the path of the downloaded artifact. Container/codec are
    /// whatever the source offers; the transcoder normalizes afterwards.
    async fn acquire(&self, url: &str, workspace: &JobWorkspace) -> Result<PathBuf>;
}

/// yt-dlp-based acquirer.
pub struct YtDlpAcquirer {
    cookie_file: Option<String>,
}

impl YtDlpAcquirer {
    pub fn new(cookie_file: Option<String>) -> Self {
        Self { cookie_file }
    }
}

#[async_trait]
impl AudioAcquirer for YtDlpAcquirer {
    #[instrument(skip(self, workspace), fields(url = %url))]
    async fn acquire(&self, url: &str, workspace: &JobWorkspace) -> Result<PathBuf> {
        workspace.create()?;

        info!("Downloading audio from {}", url);

        let template = workspace.raw_audio_template();
        // A lossy or empty --output would let yt-dlp pick its own
        // location outside the job workspace.
        let template = template.to_str().ok_or_else(|| {
            FalaError::Acquisition(format!(
                "workspace path is not valid UTF-8: {}",
                workspace.dir().display()
            ))
        })?;

        let mut cmd = Command::new("yt-dlp");
        cmd.arg("--format").arg("bestaudio/best")
            .arg("--output").arg(template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings");

        if let Some(cookies) = &self.cookie_file {
            cmd.arg("--cookies").arg(cookies);
        }

        let result = cmd
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FalaError::ToolNotFound("yt-dlp".into()));
            }
            Err(e) => {
                return Err(FalaError::Acquisition(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FalaError::Acquisition(format!("yt-dlp failed: {stderr}")));
        }

        let downloaded = find_audio_file(workspace)?;
        debug!("Downloaded audio artifact: {:?}", downloaded);

        Ok(downloaded)
    }
}

/// Locates the downloaded artifact; yt-dlp chooses the extension.
fn find_audio_file(workspace: &JobWorkspace) -> Result<PathBuf> {
    let stem = workspace.raw_audio_stem();

    // Common audio formats that yt-dlp may produce
    for ext in &["m4a", "webm", "opus", "mp3", "ogg", "wav"] {
        let candidate = workspace.dir().join(format!("{}.{}", stem, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    // Fallback: scan the workspace for a matching prefix
    let entries = std::fs::read_dir(workspace.dir())
        .map_err(|e| FalaError::Acquisition(format!("Cannot read workspace: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(stem) {
            return Ok(entry.path());
        }
    }

    Err(FalaError::Acquisition(
        "No audio stream found after download".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;

    #[test]
    fn test_find_audio_file_prefers_known_extensions() {
        let temp = tempfile::tempdir().unwrap();
        let job = Job::new("https://example/a".into(), "resumo".into(), None);
        let ws = job.workspace(temp.path());
        ws.create().unwrap();

        std::fs::write(ws.dir().join("source.webm"), b"x").unwrap();
        let found = find_audio_file(&ws).unwrap();
        assert_eq!(found, ws.dir().join("source.webm"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_workspace_is_rejected() {
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::tempdir().unwrap();
        let bad_dir = temp.path().join(std::ffi::OsStr::from_bytes(b"j\xffb"));
        let job = Job::new("https://example/a".into(), "resumo".into(), None);
        let ws = job.workspace(&bad_dir);

        let acquirer = YtDlpAcquirer::new(None);
        let err = acquirer
            .acquire("https://example/video", &ws)
            .await
            .unwrap_err();

        match err {
            FalaError::Acquisition(msg) => assert!(msg.contains("UTF-8")),
            other => panic!("expected acquisition error, got {:?}", other),
        }
    }

    #[test]
    fn test_find_audio_file_empty_workspace_fails() {
        let temp = tempfile::tempdir().unwrap();
        let job = Job::new("https://example/a".into(), "resumo".into(), None);
        let ws = job.workspace(temp.path());
        ws.create().unwrap();

        let err = find_audio_file(&ws).unwrap_err();
        assert!(matches!(err, FalaError::Acquisition(_)));
    }
}
