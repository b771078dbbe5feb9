//! 无竞争加解锁耗时测量

use core::time::Duration;
use std::time::Instant;

use sync::{Benaphore, BlockingSignal, RecursiveBenaphore, Semaphore};

use crate::StressError;

/// 可被计时的锁：一次完整的加锁加解锁
pub trait TimedLock {
    /// 加锁后立即解锁
    fn lock_unlock(&self);
}

impl<S: BlockingSignal> TimedLock for Benaphore<S> {
    fn lock_unlock(&self) {
        self.acquire();
        self.release();
    }
}

impl TimedLock for RecursiveBenaphore {
    fn lock_unlock(&self) {
        self.acquire();
        self.release();
    }
}

impl<T> TimedLock for std::sync::Mutex<T> {
    fn lock_unlock(&self) {
        drop(self.lock());
    }
}

impl<T> TimedLock for parking_lot::Mutex<T> {
    fn lock_unlock(&self) {
        drop(self.lock());
    }
}

/// 单线程下 `iterations` 次加解锁的平均耗时
pub fn average_lock_time<L: TimedLock + ?Sized>(lock: &L, iterations: u32) -> Duration {
    if iterations == 0 {
        return Duration::ZERO;
    }
    let start = Instant::now();
    for _ in 0..iterations {
        lock.lock_unlock();
    }
    start.elapsed() / iterations
}

/// 一种锁的计时结果
#[derive(Debug, Clone, PartialEq)]
pub struct TimingReport {
    /// 锁的名称
    pub name: &'static str,
    /// 平均加解锁耗时
    pub average: Duration,
}

/// 依次测量所有锁实现
pub fn time_all(iterations: u32) -> Result<Vec<TimingReport>, StressError> {
    #[cfg_attr(not(target_os = "linux"), allow(unused_mut))]
    let mut locks: Vec<(&'static str, Box<dyn TimedLock>)> = vec![
        ("benaphore", Box::new(Benaphore::<Semaphore>::new())),
        ("recursive benaphore", Box::new(RecursiveBenaphore::new())),
        ("std mutex", Box::new(std::sync::Mutex::new(()))),
        ("parking_lot mutex", Box::new(parking_lot::Mutex::new(()))),
    ];
    #[cfg(target_os = "linux")]
    locks.push((
        "benaphore (posix semaphore)",
        Box::new(Benaphore::with_signal(sync::PosixSemaphore::new()?)),
    ));

    Ok(locks
        .iter()
        .map(|(name, lock)| TimingReport {
            name: *name,
            average: average_lock_time(lock.as_ref(), iterations),
        })
        .collect())
}
