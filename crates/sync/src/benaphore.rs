//! 简单 Benaphore
//!
//! 原子计数器记录“已调用 acquire 但尚未 release”的线程数。
//! 无竞争时 acquire/release 各只有一次原子操作，不触碰阻塞信号。

use core::sync::atomic::{AtomicIsize, Ordering};

use lock_api::{GuardSend, RawMutex};

use crate::signal::{BlockingSignal, Semaphore};

/// 不可重入的 Benaphore 锁
///
/// 持有者再次调用 [`acquire`](Self::acquire) 会让自己永远阻塞；
/// 需要重入时使用 [`RecursiveBenaphore`](crate::RecursiveBenaphore)。
///
/// # 示例
/// ```
/// use sync::Benaphore;
///
/// let lock = Benaphore::new();
/// lock.acquire();
/// assert!(!lock.try_acquire());
/// lock.release();
/// assert!(lock.try_acquire());
/// lock.release();
/// ```
#[derive(Debug)]
pub struct Benaphore<S = Semaphore> {
    counter: AtomicIsize,
    signal: S,
}

impl Benaphore<Semaphore> {
    /// 创建一个使用 [`Semaphore`] 作为慢速路径的 Benaphore
    pub const fn new() -> Self {
        Benaphore::with_signal(Semaphore::new(0))
    }
}

impl Default for Benaphore<Semaphore> {
    fn default() -> Self {
        Benaphore::new()
    }
}

impl<S: BlockingSignal> Benaphore<S> {
    /// 使用给定的阻塞信号创建 Benaphore，信号的初始计数必须为 0
    pub const fn with_signal(signal: S) -> Self {
        Benaphore {
            counter: AtomicIsize::new(0),
            signal,
        }
    }

    /// 获取锁，发生竞争时阻塞
    pub fn acquire(&self) {
        if self.counter.fetch_add(1, Ordering::Acquire) + 1 > 1 {
            self.signal.wait();
        }
    }

    /// 释放锁；若有等待者，恰好唤醒其中一个
    ///
    /// # Panics
    /// 锁未被持有时调用会 panic。
    pub fn release(&self) {
        let previous = self.counter.fetch_sub(1, Ordering::Release);
        if previous <= 0 {
            self.counter.fetch_add(1, Ordering::Relaxed);
            panic!("release of a benaphore that is not held");
        }
        if previous - 1 > 0 {
            self.signal.post();
        }
    }

    /// 尝试获取锁，只在无人持有也无人等待时成功，从不阻塞
    pub fn try_acquire(&self) -> bool {
        self.counter
            .compare_exchange(0, 1, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// 锁是否被持有（或有线程正在获取）
    pub fn is_locked(&self) -> bool {
        self.counter.load(Ordering::Relaxed) > 0
    }

    /// 计数器快照：持有者加等待者的数量 (仅用于调试/测试)
    pub fn pending(&self) -> isize {
        self.counter.load(Ordering::Relaxed)
    }

    /// 底层阻塞信号
    pub fn signal(&self) -> &S {
        &self.signal
    }
}

// SAFETY: acquire/release 提供互斥，且 Benaphore 不记录持有者，允许跨线程释放。
unsafe impl RawMutex for Benaphore<Semaphore> {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Benaphore::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        self.acquire();
    }

    fn try_lock(&self) -> bool {
        self.try_acquire()
    }

    unsafe fn unlock(&self) {
        self.release();
    }

    fn is_locked(&self) -> bool {
        Benaphore::is_locked(self)
    }
}

/// 以 [`Benaphore`] 为底层的数据互斥锁
pub type BenaphoreMutex<T> = lock_api::Mutex<Benaphore, T>;

/// [`BenaphoreMutex`] 的 RAII 保护器
pub type BenaphoreMutexGuard<'a, T> = lock_api::MutexGuard<'a, Benaphore, T>;

/// 在 `const`/`static` 上下文中创建 [`BenaphoreMutex`]
pub const fn const_mutex<T>(value: T) -> BenaphoreMutex<T> {
    BenaphoreMutex::const_new(Benaphore::new(), value)
}
