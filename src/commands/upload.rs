//! File upload command
//!
//! Drives the parameterized upload flow with an indicatif progress bar
//! wired to the flow's byte-level progress callback.

use crate::config::Config;
use crate::error::Result;
use crate::upload::{ProgressFn, UploadFlow, UploadKind};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

/// Upload a PDF or rubric CSV, reporting transfer progress
pub async fn run_upload(config: Config, path: PathBuf) -> Result<()> {
    let client = super::build_client(&config)?;
    let token = config.bearer_token();
    let kind = UploadKind::from_path(&path)?;

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{wide_bar:.cyan/blue} {percent}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(path.display().to_string());

    let progress_bar = bar.clone();
    let on_progress: Arc<ProgressFn> = Arc::new(move |progress| {
        progress_bar.set_length(progress.total);
        progress_bar.set_position(progress.sent);
    });

    let flow = UploadFlow::new(&client);
    let outcome = flow
        .send(&path, kind, token.as_deref(), Some(on_progress))
        .await;
    bar.finish_and_clear();
    let outcome = outcome?;

    println!(
        "{} {} uploaded",
        "ok:".green().bold(),
        outcome.file.file_name
    );

    if let Some(criteria) = outcome.criteria {
        println!("{} criteria ingested:", criteria.len());
        for criterion in criteria {
            println!("  - {}", criterion);
        }
    }

    Ok(())
}
