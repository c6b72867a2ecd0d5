//! chime-core
//!
//! 指定時刻に HTTP コールバック（JSON の POST）を 1 回だけ発火する
//! インメモリのスケジューラ。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, ScheduledTask, DispatchState, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, CallbackSender, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryTaskStore, HttpCallbackSender）
//! - **app**: アプリケーション層（Scheduler, Dispatcher, HTTP ルーター, 設定）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

#[cfg(test)]
mod testing;
