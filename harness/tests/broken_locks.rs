//! 压力测试必须能识别失效的互斥
//!
//! 这里的锁都会放任多个线程同时进入临界区，试验应当以计数器检查失败告终。

use std::collections::HashMap;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};
use std::time::Duration;

use harness::{StressConfig, StressLock, TrialParams, perform_stress_test_on};
use parking_lot::Mutex;
use sync::ThreadToken;

/// 每个线程各自记录的持有深度
#[derive(Default)]
struct Depths(Mutex<HashMap<ThreadToken, usize>>);

impl Depths {
    fn get(&self) -> usize {
        self.0
            .lock()
            .get(&ThreadToken::current())
            .copied()
            .unwrap_or(0)
    }

    fn raise(&self) {
        *self.0.lock().entry(ThreadToken::current()).or_insert(0) += 1;
    }

    /// 返回降低后的深度
    fn lower(&self) -> usize {
        let mut depths = self.0.lock();
        let depth = depths
            .get_mut(&ThreadToken::current())
            .expect("released a lock this thread does not hold");
        *depth -= 1;
        *depth
    }
}

/// 计数器照常维护，但 acquire 从不等待
#[derive(Default)]
struct NeverWaitsLock {
    counter: AtomicIsize,
    depths: Depths,
}

impl StressLock for NeverWaitsLock {
    fn acquire(&self) {
        self.counter.fetch_add(1, Ordering::Acquire);
        self.depths.raise();
    }

    fn release(&self) {
        self.depths.lower();
        self.counter.fetch_sub(1, Ordering::Release);
    }

    fn try_acquire(&self) -> bool {
        if self.depths.get() > 0 {
            self.counter.fetch_add(1, Ordering::Acquire);
        } else if self
            .counter
            .compare_exchange(0, 1, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }
        self.depths.raise();
        true
    }

    fn held_depth(&self) -> usize {
        self.depths.get()
    }
}

/// 记录持有者，但任何调用者都能直接进入
#[derive(Default)]
struct OpenDoorLock {
    owner: AtomicUsize,
    depths: Depths,
}

impl StressLock for OpenDoorLock {
    fn acquire(&self) {
        self.owner
            .store(ThreadToken::current().get().get(), Ordering::Relaxed);
        self.depths.raise();
    }

    fn release(&self) {
        if self.depths.lower() == 0 {
            let me = ThreadToken::current().get().get();
            let _ = self
                .owner
                .compare_exchange(me, 0, Ordering::Relaxed, Ordering::Relaxed);
        }
    }

    fn try_acquire(&self) -> bool {
        self.acquire();
        true
    }

    fn held_depth(&self) -> usize {
        self.depths.get()
    }
}

fn contended_trial() -> (TrialParams, StressConfig) {
    let config = StressConfig {
        rounds: 1,
        duration: Duration::from_millis(300),
        ..StressConfig::default()
    };
    (config.trial(4, false), config)
}

#[test]
#[should_panic(expected = "mutual exclusion violated")]
fn test_lock_that_never_waits_is_caught() {
    let (params, config) = contended_trial();
    let _ = perform_stress_test_on(NeverWaitsLock::default(), &params, &config);
}

#[test]
#[should_panic(expected = "mutual exclusion violated")]
fn test_lock_that_admits_everyone_is_caught() {
    let (params, config) = contended_trial();
    let _ = perform_stress_test_on(OpenDoorLock::default(), &params, &config);
}

#[cfg(target_os = "linux")]
#[test]
fn test_recursive_benaphore_over_posix_semaphore_passes() {
    use sync::{PosixSemaphore, RecursiveBenaphore};

    let (params, config) = contended_trial();
    let lock = RecursiveBenaphore::<PosixSemaphore>::with_signal(PosixSemaphore::new().unwrap());
    let report = perform_stress_test_on(lock, &params, &config).unwrap();
    assert_eq!(report.totals.contributed, report.counter);
}
