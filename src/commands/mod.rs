/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `ask`      — One-shot question
- `chat`     — Interactive chat session
- `evaluate` — Rubric evaluation with concurrent retry-wrapped questions
- `upload`   — PDF/rubric upload with progress reporting
- `files`    — List stored rubric files
- `info`     — Show backend configuration

These handlers are intentionally small and use the library components:
the API client, the rubric orchestrator, and the upload flow.
*/

pub mod ask;
pub mod chat;
pub mod evaluate;
pub mod files;
pub mod info;
pub mod upload;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;

/// Build an API client from loaded configuration
pub(crate) fn build_client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.backend, config.auth.clone())
}
