use anyhow::Result;
use clap::Parser;
use quizlab_cli::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be configured.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    quizlab_telemetry::init_with_filter(
        &quizlab_telemetry::default_directive("quizlab-cli"),
        cli.log_format,
    )?;

    quizlab_cli::run(cli).await
}
