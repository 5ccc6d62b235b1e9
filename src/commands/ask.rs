//! One-shot question command

use crate::api::ChatRequest;
use crate::config::Config;
use crate::error::Result;

use colored::Colorize;

/// Ask a single question via `/ask` and print the answer
pub async fn run_ask(config: Config, question: String, json: bool) -> Result<()> {
    let client = super::build_client(&config)?;
    let token = config.bearer_token();

    let request = ChatRequest::question(&question);
    let response = client.ask(&request, token.as_deref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.answer_text());

    if let Some(choice) = response.choices.first() {
        if !choice.context.data_points.is_empty() {
            println!();
            println!("{}", "Supporting content:".bold());
            for point in &choice.context.data_points {
                println!("  - {}", point.dimmed());
            }
        }
    }

    Ok(())
}
