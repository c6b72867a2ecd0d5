//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部との境界（時刻、ID 生成、タスクの保管、HTTP 送信）を表し、
//! 実装の詳細を隠蔽します。

pub mod callback;
pub mod clock;
pub mod id_generator;
pub mod task_store;

// 主要な trait を再エクスポート
pub use self::callback::{CallbackSender, CallbackStatus};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, NanoIdGenerator};
pub use self::task_store::TaskStore;
