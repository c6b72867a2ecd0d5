//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **SchedulerBuilder**: 部品の組み立て（デフォルトは本番用実装）
//! - **Scheduler**: 検証・ID 採番・登録・一覧
//! - **Dispatcher**: タスクごとの発火ユニット
//! - **http**: axum ルーター（`/schedule`, `/schedule-view`）
//! - **ServerConfig**: 起動時の設定値

pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod http;
pub mod scheduler;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SchedulerBuilder};
pub use self::config::ServerConfig;
pub use self::dispatcher::{DispatchHandle, Dispatcher};
pub use self::http::router;
pub use self::scheduler::{Registration, ScheduleView, Scheduler};
