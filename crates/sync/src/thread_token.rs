//! 线程令牌
//!
//! 每个线程第一次使用时从全局计数器领取一个非零令牌，之后按值比较。
//! 零永远不会被分配，因此锁内部可以用 0 编码“无持有者”。

use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicUsize, Ordering};

use lock_api::GetThreadId;

static NEXT_TOKEN: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static CURRENT: ThreadToken = ThreadToken::allocate();
}

/// 不透明的线程身份令牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadToken(NonZeroUsize);

impl ThreadToken {
    /// 获取当前线程的令牌
    pub fn current() -> Self {
        CURRENT.with(|token| *token)
    }

    /// 令牌的数值表示
    pub const fn get(self) -> NonZeroUsize {
        self.0
    }

    fn allocate() -> Self {
        let raw = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        match NonZeroUsize::new(raw) {
            Some(id) => ThreadToken(id),
            None => panic!("thread token counter wrapped around"),
        }
    }
}

/// 以 [`ThreadToken`] 作为线程 ID 的 [`GetThreadId`] 实现
///
/// [`RecursiveBenaphore`](crate::RecursiveBenaphore) 的默认持有者身份来源。
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentThread;

// SAFETY: 每个存活线程的令牌互不相同且非零，同一线程内保持不变。
unsafe impl GetThreadId for CurrentThread {
    const INIT: Self = CurrentThread;

    fn nonzero_thread_id(&self) -> NonZeroUsize {
        ThreadToken::current().get()
    }
}
