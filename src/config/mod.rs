//! Configuration module for Fala.
//!
//! Handles loading application settings and the credential material
//! injected into the pipeline at startup.

mod credentials;
mod settings;

pub use credentials::{Credentials, GOOGLE_TOKEN_VAR, SUMMARIZATION_TOKEN_VAR};
pub use settings::{
    AcquisitionSettings, GeneralSettings, Settings, StorageSettings, SummarizationSettings,
    TranscodeSettings, TranscriptionSettings,
};
