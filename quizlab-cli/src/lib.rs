//! # quizlab-cli
//!
//! Library half of the `quizlab` binary: argument definitions, service wiring
//! and output rendering. `main.rs` only loads `.env`, installs logging and
//! calls [`run`].

pub mod cli;
pub mod render;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quizlab_gen::openrouter::{OpenRouterClient, OpenRouterConfig};
use quizlab_gen::{GeneratorConfig, QuizGenerator, QuizRequest};
use quizlab_rag::http::{HttpEmbeddingConfig, HttpEmbeddingProvider};
use quizlab_rag::{EmbeddingProvider, Retriever, RetrieverConfig};
use tracing::info;

use crate::cli::{Cli, Commands, EmbeddingArgs, GenerateArgs, OutputFormat, RetrievalArgs, RetrieveArgs};

/// Execute the parsed command, writing results to stdout.
pub async fn run(cli: Cli) -> Result<()> {
    let provider = embedding_provider(&cli.embedding)?;
    let timeout = Duration::from_secs(cli.embedding.embed_timeout_secs);

    match cli.command {
        Commands::Generate(args) => generate(args, provider, timeout).await,
        Commands::Retrieve(args) => retrieve(args, provider, timeout).await,
    }
}

/// Build the process-wide embedding provider from the environment and flags.
pub fn embedding_provider(args: &EmbeddingArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    let mut config = HttpEmbeddingConfig::from_env()?;
    if let Some(url) = &args.embedding_url {
        config.base_url = url.clone();
    }
    if let Some(model) = &args.embedding_model {
        config.model = model.clone();
    }
    info!(base_url = %config.base_url, model = %config.model, "using embedding server");
    Ok(Arc::new(HttpEmbeddingProvider::new(config)?))
}

fn build_retriever(
    args: &RetrievalArgs,
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
) -> Result<Retriever> {
    let config = RetrieverConfig::builder()
        .chunk_size(args.chunk_size)
        .top_k(args.top_k)
        .embed_timeout(timeout)
        .build()?;
    Ok(Retriever::builder().config(config).embedding_provider(provider).build()?)
}

/// Read a plain-text document.
pub async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read document {}", path.display()))
}

async fn generate(
    args: GenerateArgs,
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
) -> Result<()> {
    let text = read_document(&args.retrieval.file).await?;
    let retriever = Arc::new(build_retriever(&args.retrieval, provider, timeout)?);

    let mut model_config = OpenRouterConfig::from_env()?;
    if let Some(model) = args.model {
        model_config = model_config.with_model(model);
    }
    let model = Arc::new(OpenRouterClient::new(model_config)?);

    let generator = QuizGenerator::new(retriever, model)
        .with_config(GeneratorConfig { max_attempts: args.max_attempts, ..Default::default() })?;

    let request = QuizRequest::new(args.count, args.difficulty, args.question_type);
    let questions = generator.generate(&text, &request).await.context("quiz generation failed")?;

    let output = match args.format {
        OutputFormat::Text => render::render_quiz_text(&questions),
        OutputFormat::Json => render::render_quiz_json(&questions)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

async fn retrieve(
    args: RetrieveArgs,
    provider: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
) -> Result<()> {
    let text = read_document(&args.retrieval.file).await?;
    let retriever = build_retriever(&args.retrieval, provider, timeout)?;

    let passages = retriever
        .retrieve_scored(&text, &args.query, args.retrieval.top_k)
        .await
        .context("retrieval failed")?;

    print!("{}", render::render_passages(&passages));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn read_document_loads_plain_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "cells divide by mitosis").unwrap();

        let text = read_document(file.path()).await.unwrap();
        assert_eq!(text, "cells divide by mitosis");
    }

    #[tokio::test]
    async fn read_document_reports_missing_path() {
        let err = read_document(Path::new("/nonexistent/quizlab/notes.txt")).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/quizlab/notes.txt"));
    }

    #[test]
    fn retriever_config_comes_from_flags() {
        let args = RetrievalArgs { file: "notes.txt".into(), top_k: 4, chunk_size: 120 };
        let provider = embedding_provider(&EmbeddingArgs {
            embedding_url: Some("http://localhost:9/v1".into()),
            embedding_model: None,
            embed_timeout_secs: 5,
        })
        .unwrap();

        let retriever = build_retriever(&args, provider, Duration::from_secs(5)).unwrap();
        assert_eq!(retriever.config().top_k, 4);
        assert_eq!(retriever.config().chunk_size, 120);
        assert_eq!(retriever.config().embed_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_chunk_size_flag_is_rejected() {
        let args = RetrievalArgs { file: "notes.txt".into(), top_k: 3, chunk_size: 0 };
        let provider = embedding_provider(&EmbeddingArgs {
            embedding_url: None,
            embedding_model: None,
            embed_timeout_secs: 5,
        })
        .unwrap();
        assert!(build_retriever(&args, provider, Duration::from_secs(5)).is_err());
    }
}
