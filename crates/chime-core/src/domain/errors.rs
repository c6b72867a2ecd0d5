//! Errors - エラー型と分類
//!
//! - [`ValidationError`]: 登録リクエストの入力エラー（呼び出し側に 400 で返す）
//! - [`StoreError`]: TaskStore の操作エラー
//! - [`DeliveryError`]: コールバック送信の失敗（ログのみ、呼び出し側には返らない）
//! - [`ChimeError`]: Scheduler が返すトップレベルのエラー

use thiserror::Error;

use super::TaskId;

/// Why a registration request was rejected.
///
/// The `Display` text is returned verbatim as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid request format")]
    InvalidFormat,

    #[error("Endpoint is required")]
    MissingEndpoint,

    #[error("scheduled_at is required")]
    MissingScheduledAt,

    #[error("Invalid date format. Use RFC3339 format (e.g. 2025-03-10T15:04:05Z)")]
    InvalidTimestamp,

    #[error("Scheduled time must be in the future")]
    NotInFuture,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task id '{0}' is already scheduled")]
    DuplicateId(TaskId),
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("callback request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ChimeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task id '{0}' is already scheduled")]
    DuplicateId(TaskId),

    #[error("Error retrieving scheduled tasks")]
    Encode(#[source] serde_json::Error),
}

impl From<StoreError> for ChimeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => ChimeError::DuplicateId(id),
        }
    }
}
