//! HttpCallbackSender - reqwest による CallbackSender 実装
//!
//! タイムアウトは接続からレスポンス読み込みまでを合わせた 1 つの値です。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::domain::DeliveryError;
use crate::ports::{CallbackSender, CallbackStatus};

/// Default for the combined connect + response-read timeout.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpCallbackSender {
    http: Client,
}

impl HttpCallbackSender {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl CallbackSender for HttpCallbackSender {
    async fn send(&self, endpoint: &str, body: Vec<u8>) -> Result<CallbackStatus, DeliveryError> {
        let resp = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Ok(CallbackStatus(resp.status().as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CallbackServer;

    #[tokio::test]
    async fn posts_json_body_with_content_type() {
        let server = CallbackServer::start().await;
        let sender = HttpCallbackSender::new(DEFAULT_DELIVERY_TIMEOUT).unwrap();

        let status = sender
            .send(&server.url(), br#"{"key":"value"}"#.to_vec())
            .await
            .unwrap();

        assert!(status.is_success());
        let received = server.received().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(received[0].body, br#"{"key":"value"}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let server = CallbackServer::start_with_status(503).await;
        let sender = HttpCallbackSender::new(DEFAULT_DELIVERY_TIMEOUT).unwrap();

        let status = sender.send(&server.url(), b"null".to_vec()).await.unwrap();

        assert_eq!(status, CallbackStatus(503));
        assert!(!status.is_success());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let sender = HttpCallbackSender::new(Duration::from_secs(2)).unwrap();
        // ポート 1 には誰も listen していない
        let err = sender
            .send("http://127.0.0.1:1/hook", b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[tokio::test]
    async fn malformed_url_is_a_transport_error() {
        let sender = HttpCallbackSender::new(DEFAULT_DELIVERY_TIMEOUT).unwrap();
        let err = sender.send("not a url", b"{}".to_vec()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
