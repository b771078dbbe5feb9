//! 被压力测试驱动的锁

use lock_api::GetThreadId;
use sync::{BlockingSignal, RecursiveBenaphore};

/// 压力测试所需的可重入锁接口
///
/// 工作线程只通过这几个方法操作锁。任何实现都会受到同样的计数器检查，
/// 因此互斥失效的实现会让试验 panic。
pub trait StressLock: Sync {
    /// 获取一层，必要时阻塞
    fn acquire(&self);

    /// 释放一层
    fn release(&self);

    /// 尝试获取一层，从不阻塞
    fn try_acquire(&self) -> bool;

    /// 调用线程当前持有的深度，未持有时为 0
    fn held_depth(&self) -> usize;
}

impl<S, G> StressLock for RecursiveBenaphore<S, G>
where
    S: BlockingSignal,
    G: GetThreadId + Sync,
{
    fn acquire(&self) {
        RecursiveBenaphore::acquire(self)
    }

    fn release(&self) {
        RecursiveBenaphore::release(self)
    }

    fn try_acquire(&self) -> bool {
        RecursiveBenaphore::try_acquire(self)
    }

    fn held_depth(&self) -> usize {
        RecursiveBenaphore::held_depth(self)
    }
}
