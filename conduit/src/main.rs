#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod catalog;

use std::sync::Arc;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use conduit_config::Config;
use conduit_dispatch::{DispatchContext, Dispatcher, NoRetrieval, OtelMetricsSink};
use conduit_routing::Router;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration, falling back to defaults when the file is absent
    let config_found = args.config.exists();
    let config = if config_found {
        Config::load(&args.config)?
    } else {
        Config::default()
    };

    // Initialize telemetry
    let telemetry = conduit_telemetry::init(config.telemetry.as_ref(), &args.log)?;

    if !config_found {
        tracing::warn!(config_path = %args.config.display(), "configuration file not found, using defaults");
    }

    let outcome = run(args.command, &config).await;

    if let Err(e) = telemetry.force_flush() {
        tracing::warn!(error = %e, "failed to flush metrics");
    }

    outcome
}

async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Classify { text } => {
            println!("{}", conduit_routing::classify(&text));
        }
        Command::Route(route) => {
            let decision = Router::with_tiktoken().route(&route.to_request())?;
            print_json(&decision)?;
        }
        Command::Ask { route, context_id } => {
            let decision = Router::with_tiktoken().route(&route.to_request())?;
            let dispatcher = dispatcher(config);
            let ctx = DispatchContext {
                context_id,
                history: Vec::new(),
            };

            // Abandon the in-flight call on Ctrl+C or SIGTERM
            let shutdown = CancellationToken::new();
            let shutdown_clone = shutdown.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_clone.cancel();
            });

            let result = tokio::select! {
                result = dispatcher.dispatch(&decision, &route.text, &ctx) => result?,
                () = shutdown.cancelled() => anyhow::bail!("interrupted before {} answered", decision.backend),
            };

            print_json(&AskOutput {
                decision: &decision,
                result: &result,
                usage: &dispatcher.usage(),
            })?;
        }
        Command::Backends => {
            print!("{}", catalog::render());
        }
        Command::Health => {
            print_json(&dispatcher(config).health().await)?;
        }
        Command::Models => {
            print_json(&dispatcher(config).local_models().await)?;
        }
    }

    Ok(())
}

/// Everything `ask` reports
#[derive(Serialize)]
struct AskOutput<'a> {
    decision: &'a conduit_routing::RoutingDecision,
    result: &'a conduit_dispatch::DispatchResult,
    usage: &'a conduit_dispatch::UsageSnapshot,
}

fn dispatcher(config: &Config) -> Dispatcher {
    Dispatcher::from_config(config, Arc::new(NoRetrieval), Arc::new(OtelMetricsSink::default()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
