//! docqa - Terminal client for a document question-answering service
//!
//! This library provides the client-side core of the service: a typed HTTP
//! API client, a retry-wrapped rubric-evaluation orchestrator, and a
//! parameterized upload/CSV-ingestion flow.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: HTTP client and wire types for the backend endpoints
//! - `rubric`: Criteria parsing and the concurrent question orchestrator
//! - `upload`: Streaming file upload with progress and CSV ingestion
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use docqa::api::{ApiClient, ChatRequest};
//! use docqa::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let client = ApiClient::new(&config.backend, config.auth.clone())?;
//!     let answer = client
//!         .ask(&ChatRequest::question("Is liability capped?"), None)
//!         .await?;
//!     println!("{}", answer.answer_text());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod rubric;
pub mod upload;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::Config;
pub use error::{DocqaError, Result};
pub use rubric::{Criterion, EvaluationReport, ResponseItem, RetryPolicy};
pub use upload::{UploadFlow, UploadKind, UploadProgress};
