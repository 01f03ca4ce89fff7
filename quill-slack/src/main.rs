use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quill_hyper::Server;
use quill_slack::logging::init_logging;
use quill_slack::{app, AppConfig, Bot, LoadOptions};
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "quill-slack", version, about = "Quote of the day for Slack")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "QUILL_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Fetch a quote and post it to the configured webhook once.
    PostQuote {
        #[arg(long)]
        category: Option<String>,
    },
    /// Validate the configuration and print it with secrets redacted.
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
    })
    .context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::PostQuote { category } => post_quote(config, category).await,
        Command::CheckConfig => {
            println!("{config}");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    init_logging(&config.logging).map_err(|err| anyhow::anyhow!(err))?;

    let bot = Bot::from_config(&config).context("failed to build outbound client")?;
    let pipeline = app(bot, config.slack.verification_token.clone(), config.server.environment)
        .build()
        .context("invalid route table")?;

    let listener = TcpListener::bind(config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;

    tracing::info!(environment = ?config.server.environment, "starting quill-slack");

    Server::new(pipeline)
        .body_limit(config.server.body_limit)
        .connection_timeout(config.connection_timeout())
        .serve(listener, shutdown_signal())
        .await
        .context("server failed")
}

async fn post_quote(config: AppConfig, category: Option<String>) -> Result<()> {
    init_logging(&config.logging).map_err(|err| anyhow::anyhow!(err))?;

    let bot = Bot::from_config(&config).context("failed to build outbound client")?;
    let quote = bot.post_quote(category.as_deref()).await?;

    tracing::info!(quote = %quote.render(), "quote posted");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
