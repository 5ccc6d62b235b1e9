//! Command-line interface definition for docqa
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for asking questions, interactive chat, rubric
//! evaluation, and file management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docqa - Terminal client for a document question-answering service
///
/// Ask questions about indexed documents, chat interactively, and run
/// rubric evaluations against the backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "docqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the backend base URL from config
    #[arg(short, long, env = "DOCQA_BACKEND_URL")]
    pub backend: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for docqa
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        question: String,

        /// Print the raw JSON response instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive chat session
    Chat,

    /// Evaluate rubric criteria against the indexed documents
    Evaluate {
        /// Stored rubric file to load criteria from
        #[arg(short, long, conflicts_with = "default_rubric")]
        file: Option<String>,

        /// Use the backend's default rubric CSV
        #[arg(long)]
        default_rubric: bool,

        /// Show the model's thought process for each criterion
        #[arg(long)]
        thoughts: bool,

        /// Show supporting content snippets for each criterion
        #[arg(long)]
        supporting: bool,
    },

    /// Upload a PDF document or rubric CSV
    Upload {
        /// Path to the file (.pdf or .csv)
        path: PathBuf,
    },

    /// List stored rubric files
    Files,

    /// Show the backend configuration
    Info,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from(["docqa", "ask", "Is liability capped?"]).unwrap();
        match cli.command {
            Commands::Ask { question, json } => {
                assert_eq!(question, "Is liability capped?");
                assert!(!json);
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_cli_parses_evaluate_with_file() {
        let cli = Cli::try_parse_from(["docqa", "evaluate", "--file", "contracts.csv"]).unwrap();
        match cli.command {
            Commands::Evaluate { file, default_rubric, .. } => {
                assert_eq!(file.as_deref(), Some("contracts.csv"));
                assert!(!default_rubric);
            }
            _ => panic!("expected evaluate command"),
        }
    }

    #[test]
    fn test_cli_rejects_file_with_default_rubric() {
        let result = Cli::try_parse_from([
            "docqa",
            "evaluate",
            "--file",
            "contracts.csv",
            "--default-rubric",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_backend_override() {
        let cli = Cli::try_parse_from([
            "docqa",
            "--backend",
            "https://docqa.example.com",
            "files",
        ])
        .unwrap();
        assert_eq!(cli.backend.as_deref(), Some("https://docqa.example.com"));
        assert!(matches!(cli.command, Commands::Files));
    }

    #[test]
    fn test_cli_parses_upload_path() {
        let cli = Cli::try_parse_from(["docqa", "upload", "rubric.csv"]).unwrap();
        match cli.command {
            Commands::Upload { path } => assert_eq!(path, PathBuf::from("rubric.csv")),
            _ => panic!("expected upload command"),
        }
    }
}
