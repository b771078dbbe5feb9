//! 阻塞信号
//!
//! Benaphore 的慢速路径：一个计数的 wait/post 原语。
//! `wait` 阻塞直到计数大于 0 然后减一；`post` 加一并唤醒至多一个等待者。

use parking_lot::{Condvar, Mutex};

/// 计数阻塞信号的抽象
///
/// 锁只在发生竞争时才调用这里的方法，因此实现可以是相对昂贵的内核对象。
pub trait BlockingSignal: Send + Sync {
    /// 阻塞直到计数大于 0，然后原子地将其减一
    fn wait(&self);

    /// 计数加一，并唤醒一个等待者（如果有）
    fn post(&self);

    /// 读取当前计数
    ///
    /// 仅用于诊断：返回值在读出之后随时可能被并发的 wait/post 改变。
    fn value(&self) -> usize;
}

/// 基于 `parking_lot` 互斥锁与条件变量的可移植计数信号量
///
/// 初始化不会失败，可以在 `const` 上下文中构造。
#[derive(Debug)]
pub struct Semaphore {
    count: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// 创建一个初始计数为 `initial` 的信号量
    pub const fn new(initial: usize) -> Self {
        Semaphore {
            count: parking_lot::const_mutex(initial),
            available: Condvar::new(),
        }
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Semaphore::new(0)
    }
}

impl BlockingSignal for Semaphore {
    fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.available.wait(&mut count);
        }
        *count -= 1;
    }

    fn post(&self) {
        *self.count.lock() += 1;
        self.available.notify_one();
    }

    fn value(&self) -> usize {
        *self.count.lock()
    }
}

#[cfg(target_os = "linux")]
pub use posix::PosixSemaphore;

#[cfg(target_os = "linux")]
mod posix {
    use core::cell::UnsafeCell;

    use super::BlockingSignal;
    use crate::SyncError;

    /// 进程内（非共享）的 POSIX 无名信号量
    ///
    /// `sem_t` 初始化后不能移动，因此放在堆上。
    pub struct PosixSemaphore {
        sem: Box<UnsafeCell<libc::sem_t>>,
    }

    // SAFETY: sem_t 的所有操作都由 libc 保证线程安全。
    unsafe impl Send for PosixSemaphore {}
    unsafe impl Sync for PosixSemaphore {}

    fn last_errno() -> i32 {
        std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
    }

    impl PosixSemaphore {
        /// 创建一个初始计数为 0 的信号量
        pub fn new() -> Result<Self, SyncError> {
            Self::with_count(0)
        }

        /// 创建一个初始计数为 `initial` 的信号量
        ///
        /// # 错误
        /// `sem_init` 失败时返回 [`SyncError::SignalInit`]。
        pub fn with_count(initial: u32) -> Result<Self, SyncError> {
            // SAFETY: sem_t 是纯数据，全零是合法的未初始化占位值，随后由 sem_init 填充。
            let sem = Box::new(UnsafeCell::new(unsafe { core::mem::zeroed::<libc::sem_t>() }));
            // SAFETY: 指针指向堆上有效且不会移动的 sem_t；pshared = 0 表示仅线程间共享。
            let rc = unsafe { libc::sem_init(sem.get(), 0, initial) };
            if rc != 0 {
                return Err(SyncError::SignalInit {
                    errno: last_errno(),
                });
            }
            Ok(PosixSemaphore { sem })
        }
    }

    impl BlockingSignal for PosixSemaphore {
        fn wait(&self) {
            loop {
                // SAFETY: sem 在 new 中已成功初始化，直到 drop 才销毁。
                if unsafe { libc::sem_wait(self.sem.get()) } == 0 {
                    return;
                }
                let errno = last_errno();
                if errno != libc::EINTR {
                    panic!("sem_wait failed (errno {})", errno);
                }
            }
        }

        fn post(&self) {
            // SAFETY: 同上
            if unsafe { libc::sem_post(self.sem.get()) } != 0 {
                panic!("sem_post failed (errno {})", last_errno());
            }
        }

        fn value(&self) -> usize {
            let mut value: libc::c_int = 0;
            // SAFETY: 同上；value 是有效的输出位置
            unsafe { libc::sem_getvalue(self.sem.get(), &mut value) };
            value.max(0) as usize
        }
    }

    impl Drop for PosixSemaphore {
        fn drop(&mut self) {
            // SAFETY: 拥有 &mut self 时不可能还有等待者
            unsafe { libc::sem_destroy(self.sem.get()) };
        }
    }

    impl core::fmt::Debug for PosixSemaphore {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_struct("PosixSemaphore")
                .field("value", &self.value())
                .finish()
        }
    }
}
