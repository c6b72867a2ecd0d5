//! CallbackSender port - 発火時の HTTP コールバック送信
//!
//! # 実装
//! - **HttpCallbackSender**: reqwest による本番用実装（impls/http_sender.rs）
//!
//! Dispatcher はこの trait 越しに送信するため、テストではネットワーク無しで
//! 差し替えられます。

use async_trait::async_trait;

use crate::domain::DeliveryError;

/// HTTP status returned by the callback endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackStatus(pub u16);

impl CallbackStatus {
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }
}

/// Sends one JSON POST to a callback endpoint.
///
/// A non-2xx response is not an error here: it is returned as a status and the
/// caller decides how to report it. Exactly one attempt is made per call.
#[async_trait]
pub trait CallbackSender: Send + Sync {
    async fn send(&self, endpoint: &str, body: Vec<u8>) -> Result<CallbackStatus, DeliveryError>;
}
