//! InMemoryTaskStore - プロセス内の TaskStore 実装
//!
//! # 実装詳細
//! - HashMap<String, Vec<ScheduledTask>> で scheduled_at ごとにバケットを管理
//! - ストア全体で 1 つの RwLock（バケット単位のロックはしない）
//! - 再起動を跨いだ永続化はしない

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ScheduledTask, StoreError, TaskId};
use crate::ports::TaskStore;

/// scheduled_at -> tasks in insertion order.
type Buckets = HashMap<String, Vec<ScheduledTask>>;

#[derive(Default)]
pub struct InMemoryTaskStore {
    buckets: RwLock<Buckets>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct target-time buckets.
    pub async fn bucket_count(&self) -> usize {
        self.buckets.read().await.len()
    }

    /// Tasks of one bucket, in insertion order.
    pub async fn bucket(&self, scheduled_at: &str) -> Option<Vec<ScheduledTask>> {
        self.buckets.read().await.get(scheduled_at).cloned()
    }
}

/// Remove `index` from the bucket and drop the bucket once it is empty.
fn remove_from_bucket(buckets: &mut Buckets, scheduled_at: &str, index: usize) -> bool {
    let Some(tasks) = buckets.get_mut(scheduled_at) else {
        return false;
    };
    if index >= tasks.len() {
        return false;
    }
    tasks.remove(index);
    if tasks.is_empty() {
        buckets.remove(scheduled_at);
    }
    true
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: ScheduledTask) {
        let mut buckets = self.buckets.write().await;
        buckets
            .entry(task.scheduled_at().to_string())
            .or_default()
            .push(task);
    }

    async fn try_insert(&self, task: ScheduledTask) -> Result<(), StoreError> {
        let mut buckets = self.buckets.write().await;
        let taken = buckets
            .values()
            .flatten()
            .any(|pending| pending.id() == task.id());
        if taken {
            return Err(StoreError::DuplicateId(task.id().clone()));
        }
        buckets
            .entry(task.scheduled_at().to_string())
            .or_default()
            .push(task);
        Ok(())
    }

    async fn list_all(&self) -> Vec<ScheduledTask> {
        let buckets = self.buckets.read().await;
        buckets.values().flatten().cloned().collect()
    }

    async fn remove_at(&self, scheduled_at: &str, index: usize) {
        let mut buckets = self.buckets.write().await;
        if !remove_from_bucket(&mut buckets, scheduled_at, index) {
            tracing::debug!(scheduled_at, index, "remove_at: nothing to remove");
        }
    }

    async fn remove_by_id(&self, scheduled_at: &str, id: &TaskId) -> bool {
        let mut buckets = self.buckets.write().await;
        let index = buckets
            .get(scheduled_at)
            .and_then(|tasks| tasks.iter().position(|t| t.id() == id));
        match index {
            Some(index) => remove_from_bucket(&mut buckets, scheduled_at, index),
            None => false,
        }
    }

    async fn len(&self) -> usize {
        let buckets = self.buckets.read().await;
        buckets.values().map(Vec::len).sum()
    }
}
