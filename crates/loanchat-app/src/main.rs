mod cli;
mod host;
mod repl;
mod terminal;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use loanchat_common::ConfigError;
use loanchat_config::schema::LogLevel;
use loanchat_config::LoanchatConfig;
use loanchat_core::{ClientConfig, ConversationClient, ConversationSession};

const DEFAULT_LOG_DIRECTIVE: &str = "loanchat=info";

/// `--log-level` wins over the config file. A bare level applies to our
/// crates only; anything containing `=` is used as a full directive.
fn log_directive(cli_level: Option<&str>, config_level: LogLevel) -> String {
    match cli_level {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("loanchat={level}"),
        None => format!("loanchat={}", config_level.as_directive()),
    }
}

/// Logs go to stderr so they never interleave with the transcript.
fn init_logging(directives: &str) {
    let mut parsed: Vec<Directive> = directives
        .split(',')
        .filter_map(|d| d.trim().parse().ok())
        .collect();
    if parsed.is_empty() {
        parsed.extend(DEFAULT_LOG_DIRECTIVE.parse::<Directive>().ok());
    }
    let filter = parsed
        .into_iter()
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &cli::Args) -> Result<LoanchatConfig, ConfigError> {
    match &args.config {
        Some(path) => loanchat_config::load_config_from(Path::new(path)),
        None => loanchat_config::load_config(),
    }
}

/// A file named with `--config` must load. Problems with the default
/// location fall back to built-in defaults. `--base-url` is applied last.
fn resolve_config(
    args: &cli::Args,
    loaded: Result<LoanchatConfig, ConfigError>,
) -> Result<LoanchatConfig, ConfigError> {
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => return Err(e),
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            LoanchatConfig::default()
        }
    };
    if let Some(ref base_url) = args.base_url {
        config.server.base_url = base_url.clone();
        loanchat_config::validation::validate(&config)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = cli::parse();

    // Config is read before logging so its level can apply; failures are
    // reported once the subscriber is up.
    let loaded = load_config(&args);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level)
        .unwrap_or_default();
    init_logging(&log_directive(args.log_level.as_deref(), level));

    tracing::info!("loanchat v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let config = match resolve_config(&args, loaded) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            return ExitCode::from(2);
        }
    };
    tracing::info!("Conversation engine at {}", config.server.base_url);

    if args.print_config {
        println!("{}", loanchat_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let client = match ConversationClient::new(ClientConfig::from_server_config(&config.server)) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to create client: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.check {
        return match client.health().await {
            Ok(health) if health.is_healthy() => {
                println!("{}: {}", health.status, health.message);
                ExitCode::SUCCESS
            }
            Ok(health) => {
                println!("{}: {}", health.status, health.message);
                ExitCode::FAILURE
            }
            Err(e) => {
                println!("unreachable: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let renderer = Arc::new(terminal::TerminalRenderer::stdout());
    let session = ConversationSession::from_config(client.clone(), renderer.clone(), &config);
    let host = host::SystemHost::from_config(&config.download);
    tracing::debug!("Fetched letters are saved to {}", host.output_dir().display());

    let repl = repl::Repl::new(session, client, renderer, host);
    if let Err(e) = repl.run().await {
        tracing::error!("Input loop failed: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
