use std::sync::Arc;

use tokio::signal;
use tracing::info;

use arcade_gateway::config::{Config, SinkMode};
use arcade_gateway::create_routes;
use arcade_gateway::dispatch::{Dispatcher, WRITE_TOPICS};
use arcade_gateway::graphql::build_schema;
use arcade_gateway::sink::{MemorySink, NatsSink, WriteSink};
use arcade_rpc::{GameClient, StageClient, UserClient};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting arcade gateway...");

    let config = Config::new();
    let timeout = config.rpc_timeout();

    // One client per backend, built once and shared by every request
    let games = GameClient::new(config.game_service_url.clone(), timeout);
    let stages = StageClient::new(config.stage_service_url.clone(), timeout);
    let users = UserClient::new(config.user_service_url.clone(), timeout);

    let sink: Arc<dyn WriteSink> = match config.sink {
        SinkMode::Nats => match NatsSink::connect(&config.nats_url, &WRITE_TOPICS).await {
            Ok(sink) => {
                info!("Connected to queue transport at {}", config.nats_url);
                Arc::new(sink)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to queue transport at {}: {}",
                    config.nats_url,
                    e
                );
                tracing::error!("Set SINK=memory to run without a queue.");
                std::process::exit(1);
            }
        },
        SinkMode::Memory => {
            info!("Using in-memory write sink (SINK=memory)");
            Arc::new(MemorySink::new())
        }
    };

    let dispatcher = Arc::new(Dispatcher::new(games, stages, users, sink, config.policy()));
    let schema = build_schema(dispatcher.clone());
    let routes = create_routes(dispatcher, schema);

    info!("Gateway starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Gateway started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Gateway shutdown complete.");
}
