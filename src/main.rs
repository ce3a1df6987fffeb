use std::{sync::Arc, time::Duration};

use axum::Json;
use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use plinth::{
    config::{self, AppConfigValidator},
    server::RoutingServer,
    tracing_setup,
    utils::GracefulShutdown,
};
use serde_json::json;

const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(30);

const SAMPLE_OVERLAY: &str = "\
# Development overlay; real environment variables take precedence.
DB_DRIVER=mysql
DB_HOST=localhost
DB_PORT=3306
DB_USER=root
DB_PASSWORD=root
DB_NAME=app
WEB_SERVER_PORT=:8000
RABBITMQ_HOST=rabbitmq
RABBITMQ_PORT=5672
";

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Directory searched for a development overlay file
    #[clap(short, long, default_value = ".")]
    config_dir: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate the resolved configuration
    Validate {
        /// Directory searched for a development overlay file
        #[clap(short, long, default_value = ".")]
        config_dir: String,
    },
    /// Write a sample overlay file
    Init {
        /// Output path for the sample overlay
        #[clap(short, long, default_value = "app_config.env")]
        path: String,
    },
    /// Start the routing server (default)
    Serve {
        /// Directory searched for a development overlay file
        #[clap(short, long, default_value = ".")]
        config_dir: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let (command, target) = match args.command {
        Some(Commands::Validate { config_dir }) => ("validate", config_dir),
        Some(Commands::Init { path }) => ("init", path),
        Some(Commands::Serve { config_dir }) => ("serve", config_dir),
        None => ("serve", args.config_dir),
    };

    match command {
        "validate" => validate_config_command(&target),
        "init" => init_config_command(&target),
        "serve" => serve_command(&target).await,
        _ => unreachable!(),
    }
}

fn validate_config_command(config_dir: &str) -> Result<()> {
    let environment = config::execution_environment();
    let resolved = config::resolve_config(config_dir, &environment)
        .context("failed to resolve configuration")?;

    match AppConfigValidator::validate(&resolved) {
        Ok(()) => {
            println!("configuration is valid (environment: {environment:?})");
            println!(
                "db: {}@{}:{}/{} | http: {} | rabbitmq: {}:{}",
                resolved.db_user,
                resolved.db_host,
                resolved.db_port,
                resolved.db_name,
                resolved.web_server_port,
                resolved.rabbitmq_host,
                resolved.rabbitmq_port,
            );
            Ok(())
        }
        Err(e) => Err(eyre!("configuration is invalid: {e}")),
    }
}

fn init_config_command(path: &str) -> Result<()> {
    if std::path::Path::new(path).exists() {
        return Err(eyre!("refusing to overwrite existing file '{path}'"));
    }
    std::fs::write(path, SAMPLE_OVERLAY)
        .with_context(|| format!("failed to write sample overlay to '{path}'"))?;
    println!("wrote sample overlay to {path}");
    Ok(())
}

async fn serve_command(config_dir: &str) -> Result<()> {
    let environment = config::execution_environment();
    if environment == "production" {
        tracing_setup::init_tracing()?;
    } else {
        tracing_setup::init_console_tracing()?;
    }

    let app_config =
        config::load_config(config_dir).context("failed to load configuration")?;

    let mut server = RoutingServer::new(app_config.web_server_port.clone());

    // Bootstrap-level routes only; domain handlers are registered by the
    // embedding application through the same contract.
    server.register("/health", || async { Json(json!({ "status": "ok" })) })?;

    let handle = server
        .start()
        .await
        .context("failed to start routing server")?;
    tracing::info!(addr = %handle.local_addr(), "service ready");

    let graceful_shutdown = Arc::new(GracefulShutdown::new());
    let signal_handler_shutdown = graceful_shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signal_handler_shutdown.run_signal_handler().await {
            tracing::error!("signal handler error: {}", e);
        }
    });

    let reason = graceful_shutdown.wait_for_shutdown_signal().await;
    tracing::info!(?reason, "stopping routing server");

    handle
        .stop(SHUTDOWN_DEADLINE)
        .await
        .context("server did not stop cleanly")?;
    tracing::info!("shutdown complete");
    Ok(())
}
