//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and credentials are available before
//! starting a pipeline that would otherwise fail midway.

use crate::config::Credentials;
use crate::error::{FalaError, Result};
use std::process::Command;

/// Run pre-flight checks for the pipeline: external tools plus
/// credential material.
pub fn check() -> Result<Credentials> {
    check_tool("yt-dlp")?;
    check_tool("ffmpeg")?;
    Credentials::from_env()
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(FalaError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FalaError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(FalaError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_tool_not_found() {
        let err = check_tool("fala-test-no-such-tool").unwrap_err();
        assert!(matches!(err, FalaError::ToolNotFound(_)));
    }
}
