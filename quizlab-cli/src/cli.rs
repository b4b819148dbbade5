//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use quizlab_gen::{Difficulty, QuestionType};
use quizlab_telemetry::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "quizlab")]
#[command(version)]
#[command(about = "Generate quiz questions from a plain-text document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub embedding: EmbeddingArgs,

    /// Log output format on stderr (pretty or json)
    #[arg(long, global = true, default_value = "pretty", env = "QUIZLAB_LOG_FORMAT")]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Retrieve passages and generate a quiz
    Generate(GenerateArgs),
    /// Show the passages retrieval would select for a query
    Retrieve(RetrieveArgs),
}

/// Embedding server overrides; unset flags fall back to `QUIZLAB_EMBEDDING_*`.
#[derive(Debug, Args)]
pub struct EmbeddingArgs {
    /// Base URL of the OpenAI-compatible embeddings server
    #[arg(long, global = true)]
    pub embedding_url: Option<String>,

    /// Embedding model name
    #[arg(long, global = true)]
    pub embedding_model: Option<String>,

    /// Seconds to wait for each embedding call
    #[arg(long, global = true, default_value_t = 30)]
    pub embed_timeout_secs: u64,
}

#[derive(Debug, Args)]
pub struct RetrievalArgs {
    /// Plain-text document to read
    pub file: PathBuf,

    /// Number of passages to retrieve
    #[arg(long, default_value_t = quizlab_rag::config::DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Words per chunk
    #[arg(long, default_value_t = quizlab_rag::DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub retrieval: RetrievalArgs,

    /// Number of questions (1-100)
    #[arg(short = 'n', long, default_value_t = 3)]
    pub count: usize,

    /// easy, medium or hard
    #[arg(short, long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// mcq or fill-in-the-blank
    #[arg(short = 't', long = "type", default_value = "mcq")]
    pub question_type: QuestionType,

    /// Generation attempts before giving up
    #[arg(long, default_value_t = 3)]
    pub max_attempts: usize,

    /// Chat model to use instead of OPENROUTER_MODEL
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct RetrieveArgs {
    #[command(flatten)]
    pub retrieval: RetrievalArgs,

    /// Query to rank passages against
    #[arg(short, long)]
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let cli = Cli::try_parse_from(["quizlab", "generate", "notes.txt"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.count, 3);
        assert_eq!(args.difficulty, Difficulty::Medium);
        assert_eq!(args.question_type, QuestionType::Mcq);
        assert_eq!(args.retrieval.top_k, 3);
        assert_eq!(args.retrieval.chunk_size, 200);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn generate_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "quizlab",
            "generate",
            "notes.txt",
            "-n",
            "10",
            "--difficulty",
            "hard",
            "--type",
            "fill-in-the-blank",
            "--format",
            "json",
            "--embedding-url",
            "http://embed:8080/v1",
        ])
        .unwrap();
        assert_eq!(cli.embedding.embedding_url.as_deref(), Some("http://embed:8080/v1"));
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.count, 10);
        assert_eq!(args.difficulty, Difficulty::Hard);
        assert_eq!(args.question_type, QuestionType::FillInTheBlank);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn retrieve_requires_query() {
        assert!(Cli::try_parse_from(["quizlab", "retrieve", "notes.txt"]).is_err());
        let cli = Cli::try_parse_from(["quizlab", "retrieve", "notes.txt", "-q", "cells"]).unwrap();
        assert!(matches!(cli.command, Commands::Retrieve(ref args) if args.query == "cells"));
    }
}
