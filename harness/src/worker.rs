//! 工作线程主循环
//!
//! 每轮：先做一段随机长度的工作，再随机选出目标深度与获取方式，
//! 把持有深度调整到目标，持锁时修改共享计数器。

use klog::pr_debug;
use prng::MersenneTwister;

use crate::StressLock;
use crate::config::{DEPTH_SCALE, StressConfig};
use crate::shared::{SharedState, ThreadStats};

/// 互斥失效时所有检查共用的 panic 消息前缀
pub(crate) const EXCLUSION_VIOLATED: &str = "mutual exclusion violated";

/// 调用线程在锁上的持有深度
///
/// 析构时释放所有剩余层级，工作线程 panic 时其他线程不会因此永远阻塞。
pub(crate) struct HeldDepth<'a, L: StressLock> {
    lock: &'a L,
    depth: usize,
}

impl<'a, L: StressLock> HeldDepth<'a, L> {
    pub(crate) fn new(lock: &'a L) -> Self {
        HeldDepth { lock, depth: 0 }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// 逐层释放直到深度不超过 `target`
    pub(crate) fn lower_to(&mut self, target: usize) {
        while self.depth > target {
            self.lock.release();
            self.depth -= 1;
        }
    }

    /// 逐层获取直到深度达到 `target`
    ///
    /// `use_try` 时使用非阻塞获取，第一次失败即停止，深度保持在已达到的层级。
    pub(crate) fn raise_to(&mut self, target: usize, use_try: bool) {
        while self.depth < target {
            if use_try {
                if !self.lock.try_acquire() {
                    break;
                }
            } else {
                self.lock.acquire();
            }
            self.depth += 1;
        }
    }
}

impl<L: StressLock> Drop for HeldDepth<'_, L> {
    fn drop(&mut self) {
        // release 本身 panic 后锁与记录的深度不再一致，再释放只会二次 panic
        if std::thread::panicking() && self.lock.held_depth() != self.depth {
            return;
        }
        self.lower_to(0);
    }
}

/// 本轮不持锁的工作量：泊松分布取整后截断到上限
pub(crate) fn work_units(rng: &mut MersenneTwister, config: &StressConfig) -> u64 {
    let units = rng.poisson_interval(config.mean_work_units) + 0.5;
    (units as u64).min(config.max_work_units)
}

/// 运行一个工作线程直到收到停止信号
///
/// 不变式被破坏时 panic：持锁期间计数器被他人修改或回退，
/// 或者自己写入的值没有原样保留。返回前释放全部持有层级。
pub(crate) fn run_worker<L: StressLock>(
    ordinal: usize,
    shared: &SharedState<L>,
    config: &StressConfig,
) -> ThreadStats {
    let mut rng = MersenneTwister::new(config.seed.wrapping_add(ordinal as u32));
    let mut held = HeldDepth::new(&shared.lock);
    let mut stats = ThreadStats::default();
    let increment = ordinal as i64 + 1;
    let mut last_observed = 0i64;

    while !shared.stop.is_raised() {
        stats.iterations += 1;

        let units = work_units(&mut rng, config);
        rng.spin(units);
        stats.work_units += units;

        // 上一轮结束时仍持有锁，则计数器必须保持不变
        if held.depth() > 0 {
            let now = shared.counter.get();
            assert_eq!(
                now,
                last_observed,
                "{}: worker {} held the lock at depth {} but the counter changed",
                EXCLUSION_VIOLATED,
                ordinal,
                held.depth()
            );
        }

        let fraction = rng.fraction();
        let target = (fraction * fraction * DEPTH_SCALE) as usize;
        let use_try = rng.integer() & 1 == 0;

        held.lower_to(target);
        held.raise_to(target, use_try);

        if held.depth() > 0 {
            let before = shared.counter.get();
            assert!(
                before >= last_observed,
                "{}: worker {} saw the counter go back from {} to {}",
                EXCLUSION_VIOLATED,
                ordinal,
                last_observed,
                before
            );
            let written = shared.counter.add_while_locked(increment);
            let after = shared.counter.get();
            assert_eq!(
                after,
                written,
                "{}: worker {} wrote {} but read back {}",
                EXCLUSION_VIOLATED,
                ordinal,
                written,
                after
            );
            stats.contributed += increment;
            last_observed = after;
        }
    }

    drop(held);
    pr_debug!(
        "worker {} finished: {} iterations, contributed {}",
        ordinal,
        stats.iterations,
        stats.contributed
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::thread;
    use std::time::Duration;
    use sync::RecursiveBenaphore;

    #[test]
    fn test_held_depth_raise_and_lower() {
        let lock = RecursiveBenaphore::new();
        let mut held = HeldDepth::new(&lock);
        held.raise_to(3, false);
        assert_eq!(held.depth(), 3);
        assert_eq!(lock.held_depth(), 3);
        held.lower_to(1);
        assert_eq!(lock.held_depth(), 1);
        held.raise_to(2, true);
        assert_eq!(lock.held_depth(), 2);
        drop(held);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_try_raise_stops_when_lock_is_busy() {
        let lock = RecursiveBenaphore::new();
        lock.acquire();
        thread::scope(|s| {
            s.spawn(|| {
                let mut held = HeldDepth::new(&lock);
                held.raise_to(2, true);
                assert_eq!(held.depth(), 0);
            });
        });
        lock.release();
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_unwind_releases_held_depth() {
        let lock = RecursiveBenaphore::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut held = HeldDepth::new(&lock);
            held.raise_to(2, false);
            panic!("worker failed while holding the lock");
        }));
        assert!(result.is_err());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_unwind_after_out_of_band_release_does_not_release_again() {
        let lock = RecursiveBenaphore::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut held = HeldDepth::new(&lock);
            held.raise_to(1, false);
            // 绕过 HeldDepth 释放，记录的深度随之失真
            lock.release();
            panic!("worker failed after its bookkeeping went stale");
        }));
        assert!(result.is_err());
        assert!(!lock.is_locked());
        assert_eq!(lock.owner_id(), None);
    }

    #[test]
    fn test_work_units_respects_cap() {
        let config = StressConfig {
            mean_work_units: 1000.0,
            max_work_units: 8,
            ..StressConfig::default()
        };
        let mut rng = MersenneTwister::new(3);
        for _ in 0..1000 {
            assert!(work_units(&mut rng, &config) <= 8);
        }
    }

    #[test]
    fn test_single_worker_contributes_whole_counter() {
        let shared = SharedState::new();
        let config = StressConfig::default();
        let stats = thread::scope(|s| {
            let worker = s.spawn(|| run_worker(2, &shared, &config));
            thread::sleep(Duration::from_millis(50));
            shared.stop.raise();
            worker.join().unwrap()
        });
        assert!(stats.iterations > 0);
        assert_eq!(stats.contributed, shared.counter.get());
        assert_eq!(stats.contributed % 3, 0);
        assert!(!shared.lock.is_locked());
    }
}
