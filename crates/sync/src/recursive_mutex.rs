//! 可重入互斥锁封装
//!
//! 提供对数据的可重入共享访问。由于同一线程可以同时持有多个保护器，
//! 保护器只给出 `&T`；需要修改时在内部使用 `Cell`/`RefCell` 等。

use core::marker::PhantomData;
use core::ops::Deref;

use crate::recursive_benaphore::RecursiveBenaphore;

/// 基于 [`RecursiveBenaphore`] 的可重入数据锁
///
/// # 示例
/// ```
/// use std::cell::Cell;
/// use sync::RecursiveMutex;
///
/// let lock = RecursiveMutex::new(Cell::new(0));
/// let outer = lock.lock();
/// let inner = lock.lock(); // 同一线程重入，不会死锁
/// inner.set(inner.get() + 1);
/// drop(inner);
/// assert_eq!(outer.get(), 1);
/// ```
pub struct RecursiveMutex<T: ?Sized> {
    raw: RecursiveBenaphore,
    data: T,
}

// SAFETY: 任意时刻只有持有者线程能拿到 &T，交接时有 happens-before 关系。
unsafe impl<T: ?Sized + Send> Sync for RecursiveMutex<T> {}

impl<T> RecursiveMutex<T> {
    /// 创建一个新的可重入锁
    pub const fn new(data: T) -> Self {
        RecursiveMutex {
            raw: RecursiveBenaphore::new(),
            data,
        }
    }

    /// 消耗锁并取出数据
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: ?Sized> RecursiveMutex<T> {
    /// 获取锁并返回 RAII 保护器
    pub fn lock(&self) -> RecursiveMutexGuard<'_, T> {
        self.raw.acquire();
        RecursiveMutexGuard {
            mutex: self,
            _not_send: PhantomData,
        }
    }

    /// 尝试获取锁，失败返回 None
    pub fn try_lock(&self) -> Option<RecursiveMutexGuard<'_, T>> {
        self.raw.try_acquire().then(|| RecursiveMutexGuard {
            mutex: self,
            _not_send: PhantomData,
        })
    }

    /// 通过独占引用直接访问数据，无需加锁
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// 当前线程是否持有该锁
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.raw.held_depth() > 0
    }
}

impl<T: ?Sized> core::fmt::Debug for RecursiveMutex<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecursiveMutex")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

/// [`RecursiveMutex`] 的 RAII 保护器
///
/// 必须在获取它的线程上释放，因此既不是 `Send` 也不是 `Sync`。
pub struct RecursiveMutexGuard<'a, T: ?Sized> {
    mutex: &'a RecursiveMutex<T>,
    _not_send: PhantomData<*const ()>,
}

impl<T: ?Sized> Deref for RecursiveMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.mutex.data
    }
}

impl<T: ?Sized> Drop for RecursiveMutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.raw.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_nested_guards() {
        let lock = RecursiveMutex::new(RefCell::new(Vec::new()));
        {
            let a = lock.lock();
            a.borrow_mut().push(1);
            let b = lock.try_lock().unwrap();
            b.borrow_mut().push(2);
            assert!(lock.is_owned_by_current_thread());
        }
        assert!(!lock.is_owned_by_current_thread());
        assert_eq!(lock.into_inner().into_inner(), vec![1, 2]);
    }

    #[test]
    fn test_try_lock_from_other_thread_fails_while_held() {
        let lock = Arc::new(RecursiveMutex::new(RefCell::new(0u32)));
        let guard = lock.lock();

        let other = Arc::clone(&lock);
        let got = thread::spawn(move || other.try_lock().is_some())
            .join()
            .unwrap();
        assert!(!got);

        drop(guard);
        let other = Arc::clone(&lock);
        let got = thread::spawn(move || other.try_lock().is_some())
            .join()
            .unwrap();
        assert!(got);
    }

    #[test]
    fn test_shared_counter_across_threads() {
        let lock = Arc::new(RecursiveMutex::new(RefCell::new(0u64)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        let outer = lock.lock();
                        let inner = lock.lock();
                        *inner.borrow_mut() += 1;
                        drop(inner);
                        drop(outer);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*lock.lock().borrow(), 20_000);
    }
}
