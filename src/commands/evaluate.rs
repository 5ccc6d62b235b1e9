//! Rubric evaluation command
//!
//! Resolves a criteria list (stored rubric file, backend default rubric,
//! config, or built-in fallback), fans out every question concurrently
//! through the retry orchestrator, and renders the settled results as a
//! criterion/response table. Ctrl-C cancels in-flight retries.

use crate::config::Config;
use crate::error::{DocqaError, Result};
use crate::rubric::{self, evaluate_all, Criterion, EvaluationReport, ResponseItem, RetryPolicy};
use crate::upload::{select_rubric_file, RubricSource};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use prettytable::{row, Table};
use tokio_util::sync::CancellationToken;

/// Run the rubric evaluation flow
pub async fn run_evaluate(
    config: Config,
    file: Option<String>,
    default_rubric: bool,
    thoughts: bool,
    supporting: bool,
) -> Result<()> {
    let client = super::build_client(&config)?;
    let token = config.bearer_token();

    let texts = if let Some(name) = &file {
        tracing::info!("Loading criteria from stored rubric: {}", name);
        select_rubric_file(&client, RubricSource::Stored(name), token.as_deref()).await?
    } else if default_rubric {
        tracing::info!("Loading criteria from the default rubric");
        select_rubric_file(&client, RubricSource::Default, token.as_deref()).await?
    } else if !config.evaluate.default_criteria.is_empty() {
        config.evaluate.default_criteria.clone()
    } else {
        rubric::default_criteria()
    };

    let criteria = Criterion::from_texts(texts);
    let policy = RetryPolicy::from(&config.retry);

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling evaluation");
            cancel_on_signal.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_message(format!("Evaluating {} criteria...", criteria.len()));

    let report = evaluate_all(&client, &criteria, token.as_deref(), &policy, &cancel).await;
    spinner.finish_and_clear();

    render_report(&client, &report, thoughts, supporting);

    if report.items.is_empty() && !report.failures.is_empty() {
        return Err(DocqaError::Api("All criteria failed to evaluate".to_string()).into());
    }
    Ok(())
}

fn render_report(
    client: &crate::api::ApiClient,
    report: &EvaluationReport,
    thoughts: bool,
    supporting: bool,
) {
    let mut table = Table::new();
    table.add_row(row![b => "Criterion", "Response"]);
    for item in &report.items {
        table.add_row(row![item.criterion.text, item.response]);
    }
    table.printstd();

    for item in &report.items {
        print_details(client, item, thoughts, supporting);
    }

    for failure in &report.failures {
        eprintln!(
            "{} {} — {}",
            "failed:".red().bold(),
            failure.criterion.text,
            failure.error
        );
    }

    if report.is_complete() {
        println!("{} {} criteria evaluated", "done:".green().bold(), report.items.len());
    } else {
        println!(
            "{} {} of {} criteria evaluated",
            "partial:".yellow().bold(),
            report.items.len(),
            report.items.len() + report.failures.len()
        );
    }
}

fn print_details(
    client: &crate::api::ApiClient,
    item: &ResponseItem,
    thoughts: bool,
    supporting: bool,
) {
    let Some(choice) = item.choices.first() else {
        return;
    };

    let citations = extract_citations(&item.response);
    if !citations.is_empty() {
        println!("{} {}", "citations:".bold(), item.criterion.text.dimmed());
        for citation in citations {
            println!("  {}", client.citation_path(&citation));
        }
    }

    if thoughts {
        if let Some(text) = &choice.context.thoughts {
            println!("{} {}", "thoughts:".bold(), item.criterion.text.dimmed());
            println!("  {}", text);
        }
    }

    if supporting && !choice.context.data_points.is_empty() {
        println!("{} {}", "supporting:".bold(), item.criterion.text.dimmed());
        for point in &choice.context.data_points {
            println!("  - {}", point);
        }
    }
}

/// Pull `[file.ext]` citation markers out of an answer body
fn extract_citations(answer: &str) -> Vec<String> {
    let mut citations = Vec::new();
    let mut rest = answer;
    while let Some(start) = rest.find('[') {
        let Some(len) = rest[start + 1..].find(']') else {
            break;
        };
        let candidate = &rest[start + 1..start + 1 + len];
        // Citation markers name a source document, e.g. [contract.pdf]
        if candidate.contains('.') && !candidate.contains(' ') {
            let candidate = candidate.to_string();
            if !citations.contains(&candidate) {
                citations.push(candidate);
            }
        }
        rest = &rest[start + 1 + len..];
    }
    citations
}
