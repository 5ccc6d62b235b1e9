//! Backend API client and wire types
//!
//! This module contains the typed HTTP client for the document-QA service
//! and the request/response structures it exchanges.

mod client;
mod models;

pub use client::ApiClient;
pub use models::{
    AnswerContext, BackendInfo, ChatMessage, ChatRequest, ChatResponse, Choice, ErrorEnvelope,
    RubricFileList, UploadedFile,
};
