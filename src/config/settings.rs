//! Configuration settings for Fala.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub acquisition: AcquisitionSettings,
    pub transcode: TranscodeSettings,
    pub storage: StorageSettings,
    pub transcription: TranscriptionSettings,
    pub summarization: SummarizationSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for per-job temporary artifacts.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/fala".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Audio acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AcquisitionSettings {
    /// Optional cookies file passed to yt-dlp for access-restricted sources.
    pub cookie_file: Option<String>,
}


/// Transcoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeSettings {
    /// Target sample rate for the canonical mono PCM artifact.
    pub sample_rate_hz: u32,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            sample_rate_hz: 16_000,
        }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Destination bucket for staged audio.
    pub bucket: String,
    /// Prefix under which per-job objects are written.
    pub key_prefix: String,
    /// Storage API endpoint.
    pub endpoint: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            bucket: "transcricao-videos".to_string(),
            key_prefix: "audio".to_string(),
            endpoint: "https://storage.googleapis.com".to_string(),
        }
    }
}

/// Speech-recognition service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Speech API endpoint.
    pub endpoint: String,
    /// Default recognition language.
    pub language_code: String,
    /// Upper bound on the long-running recognition wait.
    pub timeout_seconds: u64,
    /// Interval between operation polls.
    pub poll_interval_seconds: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://speech.googleapis.com".to_string(),
            language_code: "pt-BR".to_string(),
            timeout_seconds: 300,
            poll_interval_seconds: 5,
        }
    }
}

/// Hosted summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationSettings {
    /// Inference API endpoint.
    pub endpoint: String,
    /// Summarization model identifier.
    pub model: String,
    /// Maximum words per chunk sent to the model.
    pub chunk_word_limit: usize,
}

impl Default for SummarizationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co".to_string(),
            model: "facebook/bart-large-cnn".to_string(),
            chunk_word_limit: 1024,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fala")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_format() {
        let settings = Settings::default();
        assert_eq!(settings.transcode.sample_rate_hz, 16_000);
        assert_eq!(settings.transcription.language_code, "pt-BR");
        assert_eq!(settings.transcription.timeout_seconds, 300);
        assert_eq!(settings.summarization.chunk_word_limit, 1024);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [storage]
            bucket = "meu-bucket"
            "#,
        )
        .unwrap();
        assert_eq!(settings.storage.bucket, "meu-bucket");
        assert_eq!(settings.storage.key_prefix, "audio");
        assert_eq!(settings.transcription.language_code, "pt-BR");
    }
}
