//! Dispatcher - タスクごとの発火ユニット
//!
//! # フロー
//! 1. `spawn()` で 1 タスクにつき 1 つの tokio task を起動（登録リクエストは待たない）
//! 2. target time まで単発タイマーで待機（過去なら即時）
//! 3. payload を JSON にして endpoint へ POST（1 回だけ、リトライなし）
//! 4. 送信結果に関わらず TaskStore から ID 指定で削除
//!
//! 状態は `watch` チャネルで公開します: Pending -> Firing -> Removed
//!
//! 各ユニットは `CancellationToken` を持ちます。現状これを使うのは
//! `shutdown()` だけで、Pending のユニットは配送せずに放棄されます。
//!
//! 登録簿のエントリは spawn ごとの世代番号で区別します。発火済みの ID が
//! 再登録された場合、古いユニットは新しいユニットのエントリを消しません。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use dashmap::DashMap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::{DispatchState, ScheduledTask, TaskId};
use crate::ports::{CallbackSender, Clock, TaskStore};

/// Observer/controller for one dispatch unit.
#[derive(Clone)]
pub struct DispatchHandle {
    id: TaskId,
    generation: u64,
    cancel: CancellationToken,
    state: watch::Receiver<DispatchState>,
}

impl DispatchHandle {
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn state(&self) -> DispatchState {
        *self.state.borrow()
    }

    /// Wait until the unit reaches `Removed`, or until it exits without doing
    /// so (abandoned at shutdown). Returns the last state observed.
    pub async fn wait_removed(&self) -> DispatchState {
        let mut rx = self.state.clone();
        let reached = rx.wait_for(|s| s.is_terminal()).await.map(|s| *s).ok();
        reached.unwrap_or_else(|| *rx.borrow())
    }

    fn abandon(&self) -> bool {
        if self.state() != DispatchState::Pending {
            return false;
        }
        self.cancel.cancel();
        true
    }
}

pub struct Dispatcher {
    store: Arc<dyn TaskStore>,
    sender: Arc<dyn CallbackSender>,
    clock: Arc<dyn Clock>,
    in_flight: Arc<DashMap<TaskId, DispatchHandle>>,
    next_generation: AtomicU64,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn TaskStore>,
        sender: Arc<dyn CallbackSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sender,
            clock,
            in_flight: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Start the unit for a task that is already in the store.
    pub fn spawn(&self, task: ScheduledTask) -> DispatchHandle {
        let (state_tx, state_rx) = watch::channel(DispatchState::Pending);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let handle = DispatchHandle {
            id: task.id().clone(),
            generation,
            cancel: CancellationToken::new(),
            state: state_rx,
        };
        self.in_flight.insert(task.id().clone(), handle.clone());

        let delay = delay_until(self.clock.now(), task.target());
        debug!(task_id = %task.id(), ?delay, "timer armed");

        let unit = DispatchUnit {
            store: Arc::clone(&self.store),
            sender: Arc::clone(&self.sender),
            state_tx,
        };
        let in_flight = Arc::clone(&self.in_flight);
        let cancel = handle.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(task_id = %task.id(), "dispatch abandoned before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    unit.fire(&task).await;
                }
            }
            // 同じ ID で再登録された後継ユニットのエントリは残す
            in_flight.remove_if(task.id(), |_, h| h.generation == generation);
        });

        handle
    }

    pub fn handle(&self, id: &TaskId) -> Option<DispatchHandle> {
        self.in_flight.get(id).map(|entry| entry.value().clone())
    }

    /// Number of units that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Abandon every unit still waiting for its target time.
    /// Units already firing run to completion. Returns how many were abandoned.
    pub fn shutdown(&self) -> usize {
        let handles: Vec<DispatchHandle> = self
            .in_flight
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        handles.iter().filter(|h| h.abandon()).count()
    }
}

/// Time left until `target`, clamped to zero once it has passed.
fn delay_until(now: DateTime<Utc>, target: DateTime<FixedOffset>) -> Duration {
    (target.with_timezone(&Utc) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

struct DispatchUnit {
    store: Arc<dyn TaskStore>,
    sender: Arc<dyn CallbackSender>,
    state_tx: watch::Sender<DispatchState>,
}

impl DispatchUnit {
    async fn fire(&self, task: &ScheduledTask) {
        self.state_tx.send_replace(DispatchState::Firing);
        self.deliver(task).await;

        // 送信結果に関わらず削除する
        if self.store.remove_by_id(task.scheduled_at(), task.id()).await {
            info!(task_id = %task.id(), "task removed from queue after execution");
        } else {
            debug!(task_id = %task.id(), "task already gone from store");
        }
        self.state_tx.send_replace(DispatchState::Removed);
    }

    async fn deliver(&self, task: &ScheduledTask) {
        let body = match serde_json::to_vec(task.payload()) {
            Ok(body) => body,
            Err(e) => {
                error!(task_id = %task.id(), error = %e, "error marshalling payload");
                return;
            }
        };

        match self.sender.send(task.endpoint(), body).await {
            Ok(status) if status.is_success() => {
                info!(
                    task_id = %task.id(),
                    endpoint = task.endpoint(),
                    status = status.0,
                    "task executed"
                );
            }
            Ok(status) => {
                warn!(
                    task_id = %task.id(),
                    endpoint = task.endpoint(),
                    status = status.0,
                    "callback endpoint returned non-success status"
                );
            }
            Err(e) => {
                error!(
                    task_id = %task.id(),
                    endpoint = task.endpoint(),
                    error = %e,
                    "error executing scheduled task"
                );
            }
        }
    }
}
