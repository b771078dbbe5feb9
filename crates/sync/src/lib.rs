//! 同步原语
//!
//! 提供基于 Benaphore 模式的用户态互斥锁：
//! 快速路径只做一次原子加减，只有发生竞争时才进入阻塞信号的 wait/post。
//!
//! - [`Benaphore`] - 不可重入的简单锁
//! - [`RecursiveBenaphore`] - 记录持有者与递归深度的可重入锁
//! - [`BlockingSignal`] - 慢速路径使用的计数阻塞信号（[`Semaphore`]、`PosixSemaphore`）
//! - [`ThreadToken`] - 用于判定持有者身份的线程令牌
//!
//! # 误用
//!
//! 非持有者调用 `release` 属于编程错误，会直接 panic，而不是返回错误。
//! 锁状态在 panic 之前不会被修改。

mod benaphore;
mod error;
mod recursive_benaphore;
mod recursive_mutex;
mod signal;
mod thread_token;

pub use benaphore::*;
pub use error::SyncError;
pub use recursive_benaphore::*;
pub use recursive_mutex::*;
pub use signal::*;
pub use thread_token::*;

#[cfg(test)]
impl BlockingSignal for test_support::mock::signal::MockSignal {
    fn wait(&self) {
        test_support::mock::signal::MockSignal::wait(self)
    }

    fn post(&self) {
        test_support::mock::signal::MockSignal::post(self)
    }

    fn value(&self) -> usize {
        test_support::mock::signal::MockSignal::value(self)
    }
}
