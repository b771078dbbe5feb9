//! 可重入 Benaphore
//!
//! 在简单 Benaphore 的基础上增加持有者令牌和递归深度。
//! 计数器同时计入持有者的每一层重入和每个等待者，因此：
//!
//! - 持有者重入时计数器大于 1，但发现自己就是持有者，不会阻塞；
//! - 只有把递归深度降到 0 的那次 release 才会唤醒等待者，中间层的 release 不唤醒任何人。
//!
//! # 唤醒规则
//!
//! 释放后计数器仍大于 0 且本次 release 使深度归零时，无条件 post 一次。
//! 此时剩余计数全部来自已经（或即将）在信号上等待的线程，每个等待者恰好对应一次 post，
//! 不需要再读取信号当前计数来决定是否 post。

use core::cell::UnsafeCell;
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

use lock_api::GetThreadId;

use crate::signal::{BlockingSignal, Semaphore};
use crate::thread_token::CurrentThread;

/// “无持有者”的编码；线程 ID 的类型是 `NonZeroUsize`，不会与之冲突
const NO_OWNER: usize = 0;

/// 可重入 Benaphore 锁
///
/// 持有者可以任意次数地重新获取而不阻塞，必须释放同样次数才会真正解锁。
/// 非持有者调用 [`release`](Self::release) 会 panic。
///
/// # 示例
/// ```
/// use sync::RecursiveBenaphore;
///
/// let lock = RecursiveBenaphore::new();
/// lock.acquire();
/// assert!(lock.try_acquire());
/// assert_eq!(lock.held_depth(), 2);
/// lock.release();
/// lock.release();
/// assert!(!lock.is_locked());
/// ```
pub struct RecursiveBenaphore<S = Semaphore, G = CurrentThread> {
    counter: AtomicIsize,
    /// 持有者线程 ID，`NO_OWNER` 表示空闲；只有持有者自己写入
    owner: AtomicUsize,
    /// 递归深度，只有持有者读写
    recursion: UnsafeCell<usize>,
    signal: S,
    thread_id: G,
}

// SAFETY: recursion 只被当前持有者访问，持有权的交接经由 counter 的
// Acquire/Release 或阻塞信号建立 happens-before 关系。
unsafe impl<S: Sync, G: Sync> Sync for RecursiveBenaphore<S, G> {}

impl RecursiveBenaphore<Semaphore, CurrentThread> {
    /// 创建一个使用 [`Semaphore`] 和 [`CurrentThread`] 的可重入锁
    pub const fn new() -> Self {
        RecursiveBenaphore::with_signal(Semaphore::new(0))
    }
}

impl Default for RecursiveBenaphore<Semaphore, CurrentThread> {
    fn default() -> Self {
        RecursiveBenaphore::new()
    }
}

impl<S: BlockingSignal, G: GetThreadId> RecursiveBenaphore<S, G> {
    /// 使用给定的阻塞信号创建可重入锁，信号的初始计数必须为 0
    pub const fn with_signal(signal: S) -> Self {
        RecursiveBenaphore {
            counter: AtomicIsize::new(0),
            owner: AtomicUsize::new(NO_OWNER),
            recursion: UnsafeCell::new(0),
            signal,
            thread_id: G::INIT,
        }
    }

    #[inline]
    fn current(&self) -> usize {
        self.thread_id.nonzero_thread_id().get()
    }

    /// 获取锁；调用者已持有时只增加深度
    pub fn acquire(&self) {
        let me = self.current();
        if self.counter.fetch_add(1, Ordering::Acquire) + 1 > 1
            && self.owner.load(Ordering::Relaxed) != me
        {
            self.signal.wait();
        }
        self.owner.store(me, Ordering::Relaxed);
        // SAFETY: 走到这里调用者已是唯一持有者
        unsafe { *self.recursion.get() += 1 };
    }

    /// 释放一层；深度归零时解除持有并唤醒一个等待者
    ///
    /// # Panics
    /// 调用者不是持有者时 panic，锁状态保持不变。
    pub fn release(&self) {
        let me = self.current();
        let owner = self.owner.load(Ordering::Relaxed);
        if owner != me {
            panic!(
                "recursive benaphore released by thread {} which is not the owner (owner: {})",
                me, owner
            );
        }

        // SAFETY: 调用者是持有者
        let depth = unsafe {
            let recursion = &mut *self.recursion.get();
            *recursion -= 1;
            *recursion
        };
        if depth == 0 {
            self.owner.store(NO_OWNER, Ordering::Relaxed);
        }

        let remaining = self.counter.fetch_sub(1, Ordering::Release) - 1;
        if remaining > 0 && depth == 0 {
            self.signal.post();
        }
    }

    /// 尝试获取锁，从不阻塞
    ///
    /// 持有者调用总是成功；其他线程只有在锁完全空闲时成功，失败时没有任何副作用。
    pub fn try_acquire(&self) -> bool {
        let me = self.current();
        if self.owner.load(Ordering::Relaxed) == me {
            self.counter.fetch_add(1, Ordering::Relaxed);
        } else if self
            .counter
            .compare_exchange(0, 1, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.owner.store(me, Ordering::Relaxed);
        } else {
            return false;
        }
        // SAFETY: 调用者是持有者
        unsafe { *self.recursion.get() += 1 };
        true
    }

    /// 当前持有者的线程 ID，空闲时为 `None`
    pub fn owner_id(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.owner.load(Ordering::Relaxed))
    }

    /// 调用线程持有的递归深度，非持有者为 0
    pub fn held_depth(&self) -> usize {
        if self.owner.load(Ordering::Relaxed) == self.current() {
            // SAFETY: 调用者是持有者
            unsafe { *self.recursion.get() }
        } else {
            0
        }
    }

    /// 锁是否被持有（或有线程正在获取）
    pub fn is_locked(&self) -> bool {
        self.counter.load(Ordering::Relaxed) > 0
    }

    /// 计数器快照：持有深度加等待者数量 (仅用于调试/测试)
    pub fn pending(&self) -> isize {
        self.counter.load(Ordering::Relaxed)
    }

    /// 底层阻塞信号
    pub fn signal(&self) -> &S {
        &self.signal
    }
}

impl<S, G> core::fmt::Debug for RecursiveBenaphore<S, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecursiveBenaphore")
            .field("counter", &self.counter.load(Ordering::Relaxed))
            .field("owner", &NonZeroUsize::new(self.owner.load(Ordering::Relaxed)))
            .finish_non_exhaustive()
    }
}
