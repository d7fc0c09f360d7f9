//! Test server harness.

use appraiser::callback::{CallbackClient, HttpCallbackClient};
use appraiser::gateway::{HandlerState, create_router_with_state};
use appraiser::jobs::{JobDispatcher, JobWorker};
use appraiser::logging::LogLevel;
use appraiser::scoring::{Appraiser, StrategyKind};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
const TEST_CALLBACK_TIMEOUT_SECS: u64 = 5;
const TEST_QUEUE_CAPACITY: usize = 16;
const TEST_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    pub default_log_level: LogLevel,
    pub strategy: StrategyKind,
    pub drug_approval: bool,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            default_log_level: LogLevel::Warning,
            strategy: StrategyKind::ClampedSum,
            drug_approval: true,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    worker: Option<JobWorker>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting requests, then waits for queued jobs.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.drain(Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

async fn serve_on(
    port: u16,
    app: Router,
) -> Result<(SocketAddr, JoinHandle<()>, oneshot::Sender<()>), ServerStartupError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok((local_addr, server_handle, shutdown_tx))
}

/// Spawns the appraiser with a real HTTP callback client.
///
/// Callbacks go over the network, so pair it with [`spawn_callback_receiver`] to observe
/// delivered messages.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let client: Arc<dyn CallbackClient> = Arc::new(HttpCallbackClient::new(Duration::from_secs(
        TEST_CALLBACK_TIMEOUT_SECS,
    )));
    spawn_server_with_client(config, client).await
}

/// Spawns the appraiser with the given callback client, e.g. a `MockCallbackClient`.
pub async fn spawn_server_with_client(
    config: TestServerConfig,
    client: Arc<dyn CallbackClient>,
) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let appraiser = Arc::new(
        Appraiser::new(config.strategy.build()).with_drug_approval(config.drug_approval),
    );
    let (dispatcher, worker) = JobDispatcher::spawn(appraiser.clone(), client, TEST_QUEUE_CAPACITY);
    let state = HandlerState::new(
        appraiser,
        dispatcher,
        config.default_log_level,
        TEST_BODY_LIMIT,
    );

    let (addr, server_handle, shutdown_tx) = serve_on(port, create_router_with_state(state)).await?;

    Ok(TestServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        worker: Some(worker),
    })
}

/// A callback endpoint that forwards every posted body to a channel.
pub struct CallbackReceiver {
    pub addr: SocketAddr,
    received: mpsc::UnboundedReceiver<serde_json::Value>,
    _server_handle: JoinHandle<()>,
    _shutdown_tx: oneshot::Sender<()>,
}

impl CallbackReceiver {
    pub fn url(&self) -> String {
        format!("http://{}/callback", self.addr)
    }

    /// Next posted body, or `None` after `timeout`.
    pub async fn next(&mut self, timeout: Duration) -> Option<serde_json::Value> {
        tokio::time::timeout(timeout, self.received.recv())
            .await
            .ok()
            .flatten()
    }
}

/// Spawns a receiver answering every post with `status`.
pub async fn spawn_callback_receiver(
    status: StatusCode,
) -> Result<CallbackReceiver, ServerStartupError> {
    let (tx, received) = mpsc::unbounded_channel();

    let app = Router::new()
        .route(
            "/callback",
            post(
                |State((tx, status)): State<(mpsc::UnboundedSender<serde_json::Value>, StatusCode)>,
                 Json(body): Json<serde_json::Value>| async move {
                    let _ = tx.send(body);
                    status
                },
            ),
        )
        .with_state((tx, status));

    let (addr, server_handle, shutdown_tx) = serve_on(0, app).await?;

    Ok(CallbackReceiver {
        addr,
        received,
        _server_handle: server_handle,
        _shutdown_tx: shutdown_tx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_available_port() {
        let port = find_available_port()
            .await
            .expect("Should find available port");
        assert!(port > 0);
    }

    #[tokio::test]
    async fn test_server_config_defaults() {
        let config = TestServerConfig::default();
        assert_eq!(config.port, 0);
        assert_eq!(config.default_log_level, LogLevel::Warning);
        assert!(config.drug_approval);
    }
}
