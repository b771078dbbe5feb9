//! 阻塞信号的 Mock 实现
//!
//! 行为与真实计数信号量一致，同时记录 wait/post 的调用次数，
//! 用于验证锁的快速路径不触碰信号、以及每次释放恰好唤醒一次。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

/// 记录调用次数的计数信号
#[derive(Debug, Default)]
pub struct MockSignal {
    count: Mutex<usize>,
    available: Condvar,
    waits: AtomicUsize,
    posts: AtomicUsize,
}

impl MockSignal {
    /// 创建初始计数为 0 的 Mock 信号
    pub fn new() -> Self {
        Self::default()
    }

    /// 阻塞直到计数大于 0，然后减一
    pub fn wait(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
        let mut count = self.count.lock().unwrap();
        while *count == 0 {
            count = self.available.wait(count).unwrap();
        }
        *count -= 1;
    }

    /// 计数加一并唤醒一个等待者
    pub fn post(&self) {
        self.posts.fetch_add(1, Ordering::SeqCst);
        *self.count.lock().unwrap() += 1;
        self.available.notify_one();
    }

    /// 当前计数
    pub fn value(&self) -> usize {
        *self.count.lock().unwrap()
    }

    /// wait 被调用的次数
    pub fn wait_calls(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }

    /// post 被调用的次数
    pub fn post_calls(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }
}
