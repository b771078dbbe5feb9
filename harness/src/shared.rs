//! 工作线程共享的状态
//!
//! 每次试验新建一份 [`SharedState`]，以引用传给所有工作线程，试验结束后丢弃。

use core::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use sync::RecursiveBenaphore;

/// 只能在持有锁时修改的共享计数器
///
/// 修改被刻意拆成独立的 load 和 store：互斥一旦失效，并发修改会丢失更新，
/// 最终的求和检查随即失败。若用原子的 fetch_add，这类错误会被掩盖。
#[derive(Debug, Default)]
pub struct SharedCounter {
    value: AtomicI64,
}

impl SharedCounter {
    /// 创建值为 0 的计数器
    pub const fn new() -> Self {
        SharedCounter {
            value: AtomicI64::new(0),
        }
    }

    /// 读取当前值
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// 加上 `amount` 并返回新值；调用者必须持有锁
    pub fn add_while_locked(&self, amount: i64) -> i64 {
        let next = self.value.load(Ordering::Relaxed) + amount;
        self.value.store(next, Ordering::Relaxed);
        next
    }
}

/// 停止信号
///
/// 协调线程只写一次，工作线程每轮读取。使用 Relaxed：
/// 它只关乎活性，最终可见即可，不参与任何正确性判断。
#[derive(Debug, Default)]
pub struct StopSignal {
    raised: AtomicBool,
}

impl StopSignal {
    /// 创建未触发的停止信号
    pub const fn new() -> Self {
        StopSignal {
            raised: AtomicBool::new(false),
        }
    }

    /// 通知工作线程停止
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }

    /// 是否已经通知停止
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}

/// 一次试验的共享状态
#[derive(Debug, Default)]
pub struct SharedState<L = RecursiveBenaphore> {
    /// 被测的可重入锁
    pub lock: L,
    /// 受锁保护的计数器
    pub counter: SharedCounter,
    /// 停止信号
    pub stop: StopSignal,
}

impl SharedState {
    /// 以全新的 [`RecursiveBenaphore`] 创建共享状态
    pub const fn new() -> Self {
        SharedState::with_lock(RecursiveBenaphore::new())
    }
}

impl<L> SharedState<L> {
    /// 以给定的锁创建共享状态
    pub const fn with_lock(lock: L) -> Self {
        SharedState {
            lock,
            counter: SharedCounter::new(),
            stop: StopSignal::new(),
        }
    }
}

/// 单个工作线程的统计
///
/// 运行期间只属于该线程，线程结束后才合并进总数。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThreadStats {
    /// 外层循环次数
    pub iterations: u64,
    /// 完成的不持锁工作量
    pub work_units: u64,
    /// 累计加到共享计数器上的值
    pub contributed: i64,
}

impl ThreadStats {
    /// 把另一个线程的统计累加进来
    pub fn accumulate(&mut self, other: &ThreadStats) {
        self.iterations += other.iterations;
        self.work_units += other.work_units;
        self.contributed += other.contributed;
    }
}
