//! Interactive chat session
//!
//! A rustyline REPL over `/chat`. Conversation history and the backend's
//! opaque `session_state` token are carried across turns; the raw response
//! is interpreted here, as `chat_raw` leaves status handling to its caller.

use crate::api::{ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope};
use crate::config::Config;
use crate::error::{DocqaError, Result};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive chat loop
pub async fn run_chat(config: Config) -> Result<()> {
    let client = super::build_client(&config)?;
    let token = config.bearer_token();

    let mut editor = DefaultEditor::new()
        .map_err(|e| DocqaError::Config(format!("Failed to initialize readline: {}", e)))?;

    let mut messages: Vec<ChatMessage> = Vec::new();
    let mut session_state: Option<serde_json::Value> = None;

    println!(
        "{} Connected to {}. Type a question, or 'exit' to quit.",
        "docqa".green().bold(),
        client.base_url()
    );

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(DocqaError::Config(format!("Readline error: {}", e)).into());
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        let _ = editor.add_history_entry(line);

        messages.push(ChatMessage::user(line));
        let request = ChatRequest {
            messages: messages.clone(),
            session_state: session_state.clone(),
        };

        match chat_turn(&client, &request, token.as_deref()).await {
            Ok(response) => {
                let answer = response.answer_text().to_string();
                println!("{} {}", "assistant>".cyan().bold(), answer);

                if let Some(choice) = response.choices.first() {
                    session_state = choice.session_state.clone();
                    if let Some(followups) = &choice.context.followup_questions {
                        for followup in followups {
                            println!("  {}", format!("? {}", followup).dimmed());
                        }
                    }
                }
                messages.push(ChatMessage::assistant(answer));
            }
            Err(e) => {
                // Drop the failed turn so history stays consistent
                messages.pop();
                eprintln!("{} {}", "error:".red().bold(), e);
            }
        }
    }

    Ok(())
}

/// Interpret one raw `/chat` response: status check, error envelope, parse
async fn chat_turn(
    client: &crate::api::ApiClient,
    request: &ChatRequest,
    token: Option<&str>,
) -> Result<ChatResponse> {
    let response = client.chat_raw(request, token).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocqaError::Api(format!(
            "API request failed with status {}",
            status.as_u16()
        ))
        .into());
    }

    let body = response.text().await.map_err(DocqaError::Http)?;
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
        if let Some(message) = envelope.error {
            return Err(DocqaError::Api(message).into());
        }
    }

    serde_json::from_str(&body)
        .map_err(|e| DocqaError::Api(format!("Failed to parse chat response: {}", e)).into())
}
