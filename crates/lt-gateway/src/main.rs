//! line-translator: main binary
//!
//! Usage:
//!   line-translator                   - Start the webhook server
//!   line-translator --config <path>   - Start with an explicit config file
//!   line-translator --help            - Show help

use std::path::PathBuf;

use lt_core::Config;
use lt_line::LineBot;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Serve the webhook, optionally with an explicit config file
    Server(Option<PathBuf>),
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("line-translator {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server(path) => path,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::load(config_path.as_deref())
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting line-translator...");
    tracing::info!("Public URL: {}", config.deploy.url);

    let bot = LineBot::new(config).map_err(|e| anyhow::anyhow!("Failed to create bot: {}", e))?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    let server = tokio::spawn(async move { bot.run(shutdown_rx).await });

    tracing::info!("Press Ctrl+C to exit");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(());

    server
        .await?
        .map_err(|e| anyhow::anyhow!("Webhook server error: {}", e))?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Parse command line arguments
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<RunMode> {
    let mut args = args.into_iter();
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    Ok(RunMode::Server(config_path))
}

/// Print help message
fn print_help() {
    println!("line-translator - LINE translation and speech bot");
    println!();
    println!("Usage:");
    println!("  line-translator                  Start the webhook server");
    println!("  line-translator --config <path>  Use a specific config file");
    println!("  line-translator --help           Show this help message");
    println!("  line-translator --version        Show version");
    println!();
    println!("Configuration is read from line-translator.toml when present.");
    println!();
    println!("Environment Variables:");
    println!("  LINE_CHANNEL_SECRET        LINE channel secret (required)");
    println!("  LINE_CHANNEL_ACCESS_TOKEN  LINE channel access token (required)");
    println!("  PORT                       Webhook port (default: 5000)");
    println!("  STATIC_DIR                 Audio output directory (default: static)");
    println!("  DEPLOY_URL                 Public base URL for audio links");
    println!("  TRANSLATOR_KEY / TRANSLATOR_REGION / TRANSLATOR_ENDPOINT");
    println!("  SPEECH_KEY / SPEECH_REGION / SPEECH_ENDPOINT");
    println!("  QNA_ENDPOINT / QNA_KEY / QNA_PROJECT_NAME / QNA_DEPLOYMENT_NAME");
    println!("  REPLY_INCLUDE_JAPANESE     Add Japanese text and audio (default: false)");
    println!("  REPLY_INCLUDE_KOREAN       Add Korean text and audio (default: false)");
    println!("  RUST_LOG                   Log filter (default: info)");
}
