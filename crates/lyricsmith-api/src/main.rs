//! Lyricsmith web server and CLI entry point.
//!
//! Binary name: `lyricsmith`
//!
//! Loads `.env`, parses CLI arguments, initializes tracing, then either
//! starts the HTTP server or prints a rendered prompt.

mod cli;
mod http;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use lyricsmith_core::prompt::create_form_prompt;
use lyricsmith_core::session::SessionStore;
use lyricsmith_infra::config::load_config;
use lyricsmith_infra::credential::resolve_api_key;
use lyricsmith_infra::session::InMemorySessionStore;
use lyricsmith_observe::tracing_setup::{LogFormat, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, ServeArgs};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside local development.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(cli.log_filter(), format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment from file");
    }

    let outcome = match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Prompt(args) => {
            let request = args.into_request();
            request.validate()?;
            println!("{}", create_form_prompt(&request));
            Ok(())
        }
    };

    shutdown_tracing();
    outcome
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config).await;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let api_key = resolve_api_key(&config.completion.api_key_env);
    let sweep_interval = Duration::from_secs(config.session.sweep_interval_secs.max(1));
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(config, api_key)?;

    let shutdown = CancellationToken::new();
    let sweeper = tokio::spawn(sweep_sessions(
        state.session_store.clone(),
        sweep_interval,
        shutdown.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Lyricsmith listening on {}",
        console::style("♪").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    let token = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            token.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "session sweeper task failed");
    }

    println!("\n  Server stopped.");
    Ok(())
}

/// Periodically drop idle sessions until `shutdown` is cancelled.
async fn sweep_sessions(
    store: Arc<InMemorySessionStore>,
    every: Duration,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                match store.purge_expired(chrono::Utc::now()).await {
                    Ok(0) => {}
                    Ok(purged) => tracing::info!(purged, "expired sessions removed"),
                    Err(e) => tracing::warn!(error = %e, "session sweep failed"),
                }
            }
        }
    }

    tracing::debug!("session sweeper stopped");
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
