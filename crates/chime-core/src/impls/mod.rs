//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryTaskStore**: プロセス内の TaskStore（永続化なし）
//! - **HttpCallbackSender**: reqwest による CallbackSender

pub mod http_sender;
pub mod inmem_store;

// 主要な型を再エクスポート
pub use self::http_sender::HttpCallbackSender;
pub use self::inmem_store::InMemoryTaskStore;
