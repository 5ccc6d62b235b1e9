//! Rubric evaluation: criteria ingestion and the question orchestrator

mod criteria;
mod orchestrator;

pub use criteria::parse_criteria;
pub use orchestrator::{
    ask_with_retry, evaluate_all, Criterion, CriterionFailure, EvaluationReport, ResponseItem,
    RetryPolicy,
};

/// Built-in fallback criteria, used when neither the config file nor a
/// rubric CSV supplies a list
pub fn default_criteria() -> Vec<String> {
    vec![
        "Is our liability limited, if so what is the amount of the liability cap?".to_string(),
    ]
}
