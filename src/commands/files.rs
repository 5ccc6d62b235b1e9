//! Stored rubric file listing

use crate::config::Config;
use crate::error::Result;

use colored::Colorize;

/// List stored rubric files via `/get_rubric_files`
pub async fn run_files(config: Config) -> Result<()> {
    let client = super::build_client(&config)?;
    let token = config.bearer_token();

    let files = client.list_rubric_files(token.as_deref()).await?;
    if files.is_empty() {
        println!("No rubric files stored.");
        return Ok(());
    }

    println!("{}", "Stored rubric files:".bold());
    for file in files {
        println!("  {}", file);
    }

    Ok(())
}
