//! Wire types for the document-QA backend
//!
//! Request and response structures exchanged with the `/ask`, `/chat`, and
//! `/config` endpoints, plus the error envelope the backend may wrap any
//! response in.

use serde::{Deserialize, Serialize};

/// A single conversation message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message role: "user", "assistant", or "system"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `/ask` and `/chat`
///
/// `session_state` is an opaque token echoed back by the backend; it is
/// serialized even when null, matching what the service expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Opaque backend session token, null on first request
    pub session_state: Option<serde_json::Value>,
}

impl ChatRequest {
    /// Build a single-question request with no session state
    pub fn question(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(text)],
            session_state: None,
        }
    }
}

/// Answer context attached to a response choice
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnswerContext {
    /// Model "thought process" text, when the backend provides it
    #[serde(default)]
    pub thoughts: Option<String>,
    /// Supporting content snippets the answer was grounded on
    #[serde(default)]
    pub data_points: Vec<String>,
    /// Suggested follow-up questions
    #[serde(default)]
    pub followup_questions: Option<Vec<String>>,
}

/// One response choice from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub context: AnswerContext,
    /// Session token to carry into the next request
    #[serde(default)]
    pub session_state: Option<serde_json::Value>,
}

/// Successful response body from `/ask` and `/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

impl ChatResponse {
    /// Content of the first choice, or empty string when absent
    pub fn answer_text(&self) -> &str {
        self.choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("")
    }
}

/// Error envelope the backend may return on any status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Option<String>,
}

/// Backend configuration document returned by `/config`
///
/// Only the fields the client acts on are typed; everything else is kept
/// as raw JSON for display.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendInfo {
    #[serde(default, rename = "showAuth")]
    pub show_auth: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response body from `/get_rubric_files`
#[derive(Debug, Clone, Deserialize)]
pub struct RubricFileList {
    #[serde(default)]
    pub rubric_files: Vec<String>,
}

/// Record of a file uploaded during this session
///
/// `file_url` is a backend-issued access URL treated as opaque; it is empty
/// for PDFs, which are not re-fetchable client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub file_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_messages_and_session_state() {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::user("What is the liability cap?"),
                ChatMessage::assistant("The cap is $1M."),
                ChatMessage::user("Is that aggregate or per claim?"),
            ],
            session_state: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "What is the liability cap?");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "Is that aggregate or per claim?");

        // session_state must be present even when null
        assert!(value.as_object().unwrap().contains_key("session_state"));
        assert!(value["session_state"].is_null());
    }

    #[test]
    fn test_chat_request_question_constructor() {
        let request = ChatRequest::question("Is there a confidentiality clause?");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(request.session_state.is_none());
    }

    #[test]
    fn test_chat_response_answer_text() {
        let json = r#"{
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Liability is capped at $1M."},
                "context": {
                    "thoughts": "Searched for liability clauses",
                    "data_points": ["contract.pdf#page=4: liability shall not exceed"]
                },
                "session_state": {"token": "abc"}
            }]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.answer_text(), "Liability is capped at $1M.");
        assert_eq!(response.choices[0].context.data_points.len(), 1);
        assert!(response.choices[0].session_state.is_some());
    }

    #[test]
    fn test_chat_response_answer_text_empty_choices() {
        let response = ChatResponse { choices: vec![] };
        assert_eq!(response.answer_text(), "");
    }

    #[test]
    fn test_error_envelope_on_success_shape() {
        let envelope: ErrorEnvelope = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(envelope.error.is_none());

        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"error": "model overloaded"}"#).unwrap();
        assert_eq!(envelope.error.as_deref(), Some("model overloaded"));
    }

    #[test]
    fn test_rubric_file_list_deserialization() {
        let json = r#"{"rubric_files": ["contracts.csv", "nda.csv"]}"#;
        let list: RubricFileList = serde_json::from_str(json).unwrap();
        assert_eq!(list.rubric_files, vec!["contracts.csv", "nda.csv"]);
    }

    #[test]
    fn test_backend_info_keeps_unknown_fields() {
        let json = r#"{"showAuth": true, "showGPT4VOptions": false}"#;
        let info: BackendInfo = serde_json::from_str(json).unwrap();
        assert!(info.show_auth);
        assert!(info.extra.contains_key("showGPT4VOptions"));
    }
}
