//! ServerConfig - 起動時の設定値
//!
//! フラグ無しで起動した場合は `0.0.0.0:8080`、配送タイムアウト 10 秒。

use std::time::Duration;

use crate::impls::http_sender::DEFAULT_DELIVERY_TIMEOUT;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listener address, e.g. "127.0.0.1:8080".
    pub bind_address: String,
    /// Combined connect + response-read timeout for each callback.
    pub delivery_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}
