//! State - ディスパッチャの状態
//!
//! # 状態遷移
//! - Pending -> Firing -> Removed
//!
//! Cancelled は存在しません。シャットダウン時に放棄されたユニットは
//! Pending のまま終了します。

/// Per-task dispatch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    /// Waiting for the target time.
    Pending,

    /// Sending the callback.
    Firing,

    /// Removed from the store after firing.
    Removed,
}

impl DispatchState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchState::Removed)
    }
}
