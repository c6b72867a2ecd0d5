//! TaskStore port - 発火待ちタスクの正本
//!
//! タスクは `scheduled_at` 文字列の完全一致でバケットにまとめられます。
//! 1 ms 違いのタスクは別バケットです。
//!
//! # 設計原則
//! - 変更（insert / remove）は排他ロック、一覧は共有ロック
//! - 空のバケットは即座に削除する
//! - 存在しないバケット・位置・ID の削除はエラーではなく no-op

use async_trait::async_trait;

use crate::domain::{ScheduledTask, StoreError, TaskId};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Append to the bucket for `task.scheduled_at()`, creating it if absent.
    async fn insert(&self, task: ScheduledTask);

    /// Like `insert`, but rejects an id that is already pending anywhere in the
    /// store. The check and the append share one exclusive lock acquisition.
    async fn try_insert(&self, task: ScheduledTask) -> Result<(), StoreError>;

    /// Every pending task. Order is preserved within a bucket only.
    async fn list_all(&self) -> Vec<ScheduledTask>;

    /// Remove the task at `index` within the bucket, if both exist.
    async fn remove_at(&self, scheduled_at: &str, index: usize);

    /// Remove exactly the task with `id` from the bucket.
    /// Returns whether a task was removed.
    async fn remove_by_id(&self, scheduled_at: &str, id: &TaskId) -> bool;

    /// Total number of pending tasks.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
