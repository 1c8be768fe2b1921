//! Ask command implementation.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::job::Job;
use crate::orchestrator::Pipeline;
use anyhow::Result;

/// Run the ask command: one job, from URL to answer.
pub async fn run_ask(
    video_url: &str,
    pergunta: &str,
    language: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    let credentials = match preflight::check() {
        Ok(c) => c,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'fala doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let pipeline = Pipeline::new(settings, credentials)?;
    let job = Job::new(video_url.to_string(), pergunta.to_string(), language);

    let spinner = Output::spinner("Processing video...");

    match pipeline.run(&job).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            println!("\n{}\n", outcome.resposta);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer question: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
