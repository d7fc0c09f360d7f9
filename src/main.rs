//! Answer appraiser HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use appraiser::callback::HttpCallbackClient;
use appraiser::config::Config;
use appraiser::constants::{DEFAULT_PORT, SHUTDOWN_DRAIN_SECS};
use appraiser::gateway::{HandlerState, create_router_with_state};
use appraiser::jobs::JobDispatcher;
use appraiser::logging::init_tracing;
use appraiser::scoring::Appraiser;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    init_tracing();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        strategy = ?config.confidence_strategy,
        drug_approval = config.drug_approval,
        "Answer appraiser starting"
    );

    let appraiser = Arc::new(Appraiser::from_config(&config));
    let callback_client = Arc::new(HttpCallbackClient::new(config.callback_timeout));
    let (dispatcher, worker) =
        JobDispatcher::spawn(appraiser.clone(), callback_client, config.job_queue_capacity);

    let state = HandlerState::new(
        appraiser,
        dispatcher,
        config.default_log_level,
        config.max_body_bytes,
    );
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Waiting for pending appraisal jobs");
    if let Err(e) = worker.drain(Duration::from_secs(SHUTDOWN_DRAIN_SECS)).await {
        tracing::error!("Appraisal jobs did not finish cleanly: {}", e);
    }

    tracing::info!("Answer appraiser shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("APPRAISER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
