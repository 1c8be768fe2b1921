//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{Settings, GOOGLE_TOKEN_VAR, SUMMARIZATION_TOKEN_VAR};
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Fala Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    checks.push(check_tool(
        "yt-dlp",
        "--version",
        "Install with: pip install yt-dlp",
    ));
    checks.push(check_tool(
        "ffmpeg",
        "-version",
        "Install with your package manager (e.g. apt install ffmpeg)",
    ));
    for check in &checks {
        check.print();
    }

    println!();

    println!("{}", style("Credentials").bold());
    let token_checks = vec![
        check_env_token(GOOGLE_TOKEN_VAR, "speech/storage bearer token"),
        check_env_token(SUMMARIZATION_TOKEN_VAR, "summarization bearer token"),
    ];
    for check in &token_checks {
        check.print();
    }
    checks.extend(token_checks);

    println!();

    println!("{}", style("Directories").bold());
    let temp_check = check_temp_dir(settings);
    temp_check.print();
    checks.push(temp_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Fala.",
            errors
        ));
    } else if warnings > 0 {
        Output::warning(&format!("{} warning(s) found.", warnings));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

fn check_tool(name: &str, version_arg: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => CheckResult::ok(name, "found"),
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(_) => CheckResult::error(name, "not found in PATH", hint),
    }
}

fn check_env_token(var: &str, description: &str) -> CheckResult {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => CheckResult::ok(var, description),
        _ => CheckResult::error(
            var,
            "not set",
            &format!("Set it with: export {}='...'", var),
        ),
    }
}

fn check_temp_dir(settings: &Settings) -> CheckResult {
    let temp_dir = settings.temp_dir();
    match std::fs::create_dir_all(&temp_dir) {
        Ok(()) => CheckResult::ok("temp_dir", &format!("{} is writable", temp_dir.display())),
        Err(e) => CheckResult::error(
            "temp_dir",
            &format!("{} is not writable: {}", temp_dir.display(), e),
            "Adjust [general].temp_dir in the config file",
        ),
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("config", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "config",
            "no config file, using defaults",
            &format!("Create one at {}", path.display()),
        )
    }
}
