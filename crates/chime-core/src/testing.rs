//! Testing - テスト用の部品
//!
//! - **RecordingSender**: ネットワークを使わない CallbackSender
//! - **CallbackServer**: コールバック先になるループバックの axum サーバー

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::domain::DeliveryError;
use crate::ports::{CallbackSender, CallbackStatus};

/// One request seen by a callback target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub endpoint: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// How a [`RecordingSender`] answers.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    /// Fails the way a refused connection would.
    ConnectError,
}

/// In-process `CallbackSender` that records calls instead of using the network.
#[derive(Clone)]
pub struct RecordingSender {
    calls: Arc<Mutex<Vec<Received>>>,
    reply: Reply,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::replying(Reply::Status(200))
    }

    pub fn replying(reply: Reply) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply,
        }
    }

    pub async fn calls(&self) -> Vec<Received> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CallbackSender for RecordingSender {
    async fn send(&self, endpoint: &str, body: Vec<u8>) -> Result<CallbackStatus, DeliveryError> {
        self.calls.lock().await.push(Received {
            endpoint: endpoint.to_string(),
            content_type: Some("application/json".to_string()),
            body,
        });
        match self.reply {
            Reply::Status(code) => Ok(CallbackStatus(code)),
            Reply::ConnectError => {
                let err = reqwest::Client::new()
                    .post("http://127.0.0.1:1/")
                    .timeout(Duration::from_millis(200))
                    .send()
                    .await
                    .expect_err("nothing listens on port 1");
                Err(DeliveryError::Transport(err))
            }
        }
    }
}

#[derive(Clone)]
struct ServerState {
    received: Arc<Mutex<Vec<Received>>>,
    status: StatusCode,
}

/// Loopback HTTP server acting as a callback target.
pub struct CallbackServer {
    addr: std::net::SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
}

impl CallbackServer {
    pub async fn start() -> Self {
        Self::start_with_status(200).await
    }

    pub async fn start_with_status(status: u16) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            received: Arc::clone(&received),
            status: StatusCode::from_u16(status).expect("valid status"),
        };
        let app = Router::new()
            .route("/hook", post(record))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self { addr, received }
    }

    pub fn url(&self) -> String {
        format!("http://{}/hook", self.addr)
    }

    pub async fn received(&self) -> Vec<Received> {
        self.received.lock().await.clone()
    }

    /// Poll until at least `n` requests arrived or `within` elapsed.
    pub async fn wait_for(&self, n: usize, within: Duration) -> Vec<Received> {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            let received = self.received().await;
            if received.len() >= n || tokio::time::Instant::now() >= deadline {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

async fn record(State(state): State<ServerState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.received.lock().await.push(Received {
        endpoint: "/hook".to_string(),
        content_type,
        body: body.to_vec(),
    });
    state.status
}
