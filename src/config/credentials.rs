//! Credential material for external services.
//!
//! Tokens are opaque, pre-validated strings loaded once at process start
//! and injected into the pipeline. The core never refreshes or rewrites
//! them; rotation is the operator's concern.

use crate::error::{FalaError, Result};

/// Environment variable holding the speech/storage bearer token.
pub const GOOGLE_TOKEN_VAR: &str = "GOOGLE_ACCESS_TOKEN";

/// Environment variable holding the summarization API bearer token.
pub const SUMMARIZATION_TOKEN_VAR: &str = "SUMMARIZATION_API_TOKEN";

/// Bearer tokens for the external speech, storage and summarization services.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Token for Google Cloud Speech and Storage.
    pub google_token: String,
    /// Token for the hosted summarization endpoint.
    pub summarization_token: String,
}

impl Credentials {
    /// Load credentials from the environment.
    ///
    /// Both tokens must be present and non-empty before any request is
    /// served.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            google_token: require_var(GOOGLE_TOKEN_VAR)?,
            summarization_token: require_var(SUMMARIZATION_TOKEN_VAR)?,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => Err(FalaError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            name, name
        ))),
        Err(_) => Err(FalaError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}
