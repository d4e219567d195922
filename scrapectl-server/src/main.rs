use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser};
use scrapectl_core::{
    JobController,
    engine::{DirectoryScrapeEngine, IdentifierScraper},
};
use scrapectl_server::{
    AppState, create_app,
    infra::config::{
        ConfigLoad, ConfigLoader, ConfigLoaderOptions, FileConfigSource,
        validation,
    },
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "scrapectl-server")]
#[command(about = "Control server for long-running media scrape jobs")]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "SCRAPECTL_CONFIG")]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before the environment is read
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server(cli.serve).await
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let loader = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: args.config.clone(),
        env_file: args.env_file.clone(),
    });
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Job summaries stay visible; request spans are quiet. Override via RUST_LOG.
                "info,scrape=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration loaded");
    }
    if warnings.is_empty() {
        debug!("configuration loaded without warnings");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    for error in validation::validate(&config) {
        warn!(error = %error, "configuration problem");
    }

    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("invalid server host {:?}", config.server.host))?;

    let engine = DirectoryScrapeEngine::new(Arc::new(IdentifierScraper::new()));
    let controller = JobController::new(
        Arc::new(engine),
        Arc::new(FileConfigSource::new(loader)),
    );
    let state = AppState::new(controller);
    let router = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting scrapectl server on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
