//! Backend configuration display

use crate::config::Config;
use crate::error::Result;

/// Fetch and print the backend's `/config` document
pub async fn run_info(config: Config) -> Result<()> {
    let client = super::build_client(&config)?;
    let token = config.bearer_token();

    let info = client.fetch_config(token.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
