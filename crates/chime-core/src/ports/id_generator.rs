//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **NanoIdGenerator**: `task_<unix ナノ秒>` 形式（本番用）

use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::TaskId;
use crate::ports::Clock;

/// IdGenerator はタスク ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数の HTTP リクエストから同時に使われる）
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// NanoIdGenerator は Clock のナノ秒タイムスタンプから ID を生成
///
/// 同じ時刻が二度読まれた場合（クロック分解能が粗い、FixedClock など）は
/// 直前に払い出した値 + 1 を使うため、プロセス内で ID は重複しません。
pub struct NanoIdGenerator<C> {
    clock: C,
    last: AtomicI64,
}

impl<C: Clock> NanoIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: AtomicI64::new(i64::MIN),
        }
    }

    fn next_nanos(&self) -> i64 {
        // Out of range for i64 nanos only past year 2262.
        let now = self.clock.now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = if now > prev { now } else { prev.saturating_add(1) };
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

impl<C: Clock> IdGenerator for NanoIdGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        TaskId::from_unix_nanos(self.next_nanos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn nano_generator_generates_unique_ids() {
        let id_gen = NanoIdGenerator::new(SystemClock);

        let id1 = id_gen.generate_task_id();
        let id2 = id_gen.generate_task_id();
        let id3 = id_gen.generate_task_id();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
        assert!(id1.as_str().starts_with("task_"));
    }

    #[test]
    fn frozen_clock_still_yields_distinct_ids() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = NanoIdGenerator::new(FixedClock::new(fixed_time));
        let base = fixed_time.timestamp_nanos_opt().unwrap();

        let id1 = id_gen.generate_task_id();
        let id2 = id_gen.generate_task_id();

        // 最初の ID は時刻そのもの、次は +1 ns
        assert_eq!(id1, TaskId::from_unix_nanos(base));
        assert_eq!(id2, TaskId::from_unix_nanos(base + 1));
    }

    #[test]
    fn concurrent_generation_has_no_collisions() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = Arc::new(NanoIdGenerator::new(FixedClock::new(fixed_time)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let id_gen = Arc::clone(&id_gen);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| id_gen.generate_task_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(seen.len(), 8 * 250);
    }
}
