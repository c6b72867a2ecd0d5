//! Scheduler - プロセス全体で 1 つのコンテキスト
//!
//! 起動時に 1 度だけ構築し、破棄はしません。HTTP ハンドラには
//! `Arc<Scheduler>` として、各ディスパッチユニットには TaskStore として渡ります。

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::app::dispatcher::Dispatcher;
use crate::domain::{ChimeError, ScheduleRequest, ScheduledTask, TaskId, ValidationError};
use crate::ports::{Clock, IdGenerator, TaskStore};

/// Body of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub status: String,
    pub id: TaskId,
    pub message: String,
}

/// Snapshot of every pending task.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub total_tasks: usize,
    pub tasks: Vec<ScheduledTask>,
}

pub struct Scheduler {
    store: Arc<dyn TaskStore>,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn TaskStore>,
        dispatcher: Dispatcher,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            clock,
            ids,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn generate_id(&self) -> TaskId {
        self.ids.generate_task_id()
    }

    /// Check the request against the clock and return the parsed target time.
    pub fn validate(
        &self,
        req: &ScheduleRequest,
    ) -> Result<DateTime<FixedOffset>, ValidationError> {
        if req.endpoint.is_empty() {
            return Err(ValidationError::MissingEndpoint);
        }
        if req.scheduled_at.is_empty() {
            return Err(ValidationError::MissingScheduledAt);
        }
        let target = DateTime::parse_from_rfc3339(&req.scheduled_at)
            .map_err(|_| ValidationError::InvalidTimestamp)?;
        if target.with_timezone(&Utc) <= self.clock.now() {
            return Err(ValidationError::NotInFuture);
        }
        Ok(target)
    }

    /// Validate, store and start dispatch for one task.
    ///
    /// A caller-supplied id that is still pending is rejected with
    /// `ChimeError::DuplicateId`; nothing is stored in that case.
    pub async fn register(&self, req: ScheduleRequest) -> Result<Registration, ChimeError> {
        let target = self.validate(&req)?;

        let id = match req.id {
            Some(id) if !id.is_empty() => TaskId::new(id),
            _ => self.generate_id(),
        };
        let task = ScheduledTask::new(
            id.clone(),
            req.scheduled_at,
            target,
            req.endpoint,
            req.payload,
        );

        self.store.try_insert(task.clone()).await?;
        self.dispatcher.spawn(task);

        let at = target.to_rfc3339_opts(SecondsFormat::Secs, true);
        info!(task_id = %id, scheduled_at = %at, "task scheduled");

        Ok(Registration {
            status: "scheduled".to_string(),
            id,
            message: format!("Task scheduled to run at {at}"),
        })
    }

    pub async fn view(&self) -> ScheduleView {
        let tasks = self.store.list_all().await;
        ScheduleView {
            total_tasks: tasks.len(),
            tasks,
        }
    }

    /// Abandon pending dispatches. Returns how many were abandoned.
    pub fn shutdown(&self) -> usize {
        let abandoned = self.dispatcher.shutdown();
        info!(abandoned, "scheduler shut down");
        abandoned
    }
}
