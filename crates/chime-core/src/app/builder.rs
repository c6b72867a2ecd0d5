//! SchedulerBuilder - Scheduler の構築とワイヤリング
//!
//! # 使用例
//! ```ignore
//! let scheduler = SchedulerBuilder::new()
//!     .config(&config)
//!     .build()?;
//! ```
//!
//! 指定されなかった部品は本番用のデフォルトで埋めます:
//! - TaskStore: InMemoryTaskStore
//! - CallbackSender: HttpCallbackSender（config の delivery_timeout）
//! - Clock: SystemClock
//! - IdGenerator: NanoIdGenerator（同じ Clock を共有）

use std::sync::Arc;
use std::time::Duration;

use crate::app::config::ServerConfig;
use crate::app::dispatcher::Dispatcher;
use crate::app::scheduler::Scheduler;
use crate::domain::DeliveryError;
use crate::impls::http_sender::DEFAULT_DELIVERY_TIMEOUT;
use crate::impls::{HttpCallbackSender, InMemoryTaskStore};
use crate::ports::{CallbackSender, Clock, IdGenerator, NanoIdGenerator, SystemClock, TaskStore};

/// BuildError は Scheduler 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to build callback HTTP client: {0}")]
    CallbackClient(#[from] DeliveryError),
}

pub struct SchedulerBuilder {
    store: Option<Arc<dyn TaskStore>>,
    sender: Option<Arc<dyn CallbackSender>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    delivery_timeout: Duration,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            sender: None,
            clock: None,
            ids: None,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    pub fn config(mut self, config: &ServerConfig) -> Self {
        self.delivery_timeout = config.delivery_timeout;
        self
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sender(mut self, sender: Arc<dyn CallbackSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<Scheduler, BuildError> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryTaskStore::new()));
        let sender: Arc<dyn CallbackSender> = match self.sender {
            Some(sender) => sender,
            None => Arc::new(HttpCallbackSender::new(self.delivery_timeout)?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(NanoIdGenerator::new(Arc::clone(&clock))));

        let dispatcher = Dispatcher::new(Arc::clone(&store), sender, Arc::clone(&clock));
        Ok(Scheduler::new(store, dispatcher, clock, ids))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
