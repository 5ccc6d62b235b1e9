//! Retry-wrapped question orchestrator
//!
//! One rubric question is attempted against `/chat` with a bounded,
//! fixed-delay retry loop; the full criteria list fans out concurrently
//! and settles into an [`EvaluationReport`].

use crate::api::{ApiClient, ChatRequest, ChatResponse, Choice, ErrorEnvelope};
use crate::config::RetryConfig;
use crate::error::{DocqaError, Result};

use futures::future::join_all;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A single evaluation question with a stable identity
///
/// The id is assigned at submission time, so results correlate by id even
/// if the criteria list is replaced while a batch is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub id: Uuid,
    pub text: String,
}

impl Criterion {
    /// Create a criterion with a fresh id
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }

    /// Assign ids to a list of criterion texts
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts.into_iter().map(Self::new).collect()
    }
}

/// Retry policy for a single question attempt
///
/// The delay is fixed for every attempt — no backoff, no jitter. That is a
/// deliberate simplicity choice inherited from the service's usage pattern,
/// not a tuned policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Sleep between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.delay(),
        }
    }
}

impl RetryPolicy {
    /// Total attempts this policy allows (initial attempt plus retries)
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// One criterion paired with its settled answer
#[derive(Debug, Clone)]
pub struct ResponseItem {
    pub criterion: Criterion,
    /// Content of the first response choice
    pub response: String,
    /// Full choices array, kept for citation and analysis rendering
    pub choices: Vec<Choice>,
}

/// A criterion whose retry budget was exhausted
#[derive(Debug, Clone)]
pub struct CriterionFailure {
    pub criterion: Criterion,
    pub error: String,
}

/// Outcome of a fan-out evaluation
///
/// Partial results are retained: every criterion settles into either an
/// item or a failure, in criteria-list order.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub items: Vec<ResponseItem>,
    pub failures: Vec<CriterionFailure>,
}

impl EvaluationReport {
    /// True when every criterion produced an answer
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Look up the settled answer for a criterion id
    pub fn item(&self, id: Uuid) -> Option<&ResponseItem> {
        self.items.iter().find(|item| item.criterion.id == id)
    }
}

/// Ask one question via `/chat` with bounded fixed-delay retry
///
/// An attempt fails on a non-2xx status or an `{error}` body. Failed
/// attempts sleep `policy.delay` then re-attempt until the budget is
/// exhausted, at which point the last failure propagates. The cancellation
/// token is checked before each attempt and interrupts the inter-retry
/// sleep.
///
/// # Errors
///
/// Returns [`DocqaError::Cancelled`] on cancellation, or
/// [`DocqaError::RetriesExhausted`] carrying the final failure message.
pub async fn ask_with_retry(
    client: &ApiClient,
    question: &str,
    token: Option<&str>,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<ChatResponse> {
    let request = ChatRequest::question(question);
    let total = policy.total_attempts();
    let mut last_failure = String::new();

    for attempt in 1..=total {
        if cancel.is_cancelled() {
            return Err(DocqaError::Cancelled.into());
        }

        match attempt_once(client, &request, token).await {
            Ok(response) => {
                if attempt > 1 {
                    tracing::info!("Question succeeded on attempt {}/{}", attempt, total);
                }
                return Ok(response);
            }
            Err(e) => {
                tracing::warn!("Attempt {}/{} failed: {}", attempt, total, e);
                last_failure = e.to_string();
            }
        }

        if attempt < total {
            tokio::select! {
                _ = cancel.cancelled() => return Err(DocqaError::Cancelled.into()),
                _ = tokio::time::sleep(policy.delay) => {}
            }
        }
    }

    Err(DocqaError::RetriesExhausted {
        attempts: total,
        message: last_failure,
    }
    .into())
}

/// One `/chat` attempt: transport, status check, error-envelope check
async fn attempt_once(
    client: &ApiClient,
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

/// Evaluate every criterion concurrently
///
/// All questions launch at once (no concurrency cap) and each settles
/// independently; completion order does not affect report order, which
/// follows the criteria list. Cancelling the token stops retries and
/// records the remaining criteria as failed.
pub async fn evaluate_all(
    client: &ApiClient,
    criteria: &[Criterion],
    token: Option<&str>,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> EvaluationReport {
    tracing::info!("Evaluating {} rubric criteria", criteria.len());

    let attempts = criteria.iter().map(|criterion| async move {
        let result = ask_with_retry(client, &criterion.text, token, policy, cancel).await;
        (criterion.clone(), result)
    });

    let mut report = EvaluationReport::default();
    for (criterion, result) in join_all(attempts).await {
        match result {
            Ok(response) => {
                let response_text = response.answer_text().to_string();
                report.items.push(ResponseItem {
                    criterion,
                    response: response_text,
                    choices: response.choices,
                });
            }
            Err(e) => {
                tracing::error!("Criterion \"{}\" failed: {}", criterion.text, e);
                report.failures.push(CriterionFailure {
                    criterion,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_ids_are_unique() {
        let criteria = Criterion::from_texts(["A", "B", "A"]);
        assert_eq!(criteria.len(), 3);
        assert_ne!(criteria[0].id, criteria[1].id);
        assert_ne!(criteria[0].id, criteria[2].id);
        assert_eq!(criteria[0].text, "A");
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.delay, Duration::from_millis(1000));
        assert_eq!(policy.total_attempts(), 6);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = RetryConfig {
            max_retries: 2,
            delay_ms: 50,
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay, Duration::from_millis(50));
    }

    #[test]
    fn test_report_completeness_and_lookup() {
        let criterion = Criterion::new("Is liability capped?");
        let id = criterion.id;
        let mut report = EvaluationReport::default();
        report.items.push(ResponseItem {
            criterion,
            response: "Yes, at $1M.".to_string(),
            choices: vec![],
        });

        assert!(report.is_complete());
        assert_eq!(report.item(id).unwrap().response, "Yes, at $1M.");
        assert!(report.item(Uuid::new_v4()).is_none());

        report.failures.push(CriterionFailure {
            criterion: Criterion::new("B"),
            error: "boom".to_string(),
        });
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let backend = crate::config::BackendConfig {
            base_url: "http://localhost:1".to_string(),
            timeout_seconds: 1,
        };
        let client = ApiClient::new(&backend, crate::config::AuthConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = ask_with_retry(&client, "q", None, &RetryPolicy::default(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DocqaError>(),
            Some(DocqaError::Cancelled)
        ));
    }
}
