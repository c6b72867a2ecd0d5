//! Domain identifiers.
//!
//! # TaskId
//! 呼び出し側が指定した文字列、または `task_<unix ナノ秒>` 形式で生成された文字列。
//! 生成は `ports::IdGenerator` が担当します。
//!
//! 同じ target time を共有するタスク同士を区別できる程度に一意であれば十分です。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of generated ids.
pub const GENERATED_ID_PREFIX: &str = "task_";

/// Identifier of a scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// `task_<nanos>` 形式の ID を作成
    pub fn from_unix_nanos(nanos: i64) -> Self {
        Self(format!("{GENERATED_ID_PREFIX}{nanos}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_use_task_prefix() {
        let id = TaskId::from_unix_nanos(1_700_000_000_123_456_789);
        assert_eq!(id.as_str(), "task_1700000000123456789");
        assert_eq!(id.to_string(), "task_1700000000123456789");
    }

    #[test]
    fn task_id_serializes_as_plain_string() {
        let id = TaskId::new("invoice-42");

        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, "\"invoice-42\"");

        let deserialized: TaskId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, id);
    }
}
