//! 有界日志缓冲区
//!
//! 条目按写入顺序编号（序号单调递增）。缓冲区满时丢弃最旧的条目并计数，
//! 因此 `reader_index` 之前的序号可能已经不可读。
//!
//! 缓冲区由 [`BenaphoreMutex`] 保护：日志写入几乎总是无竞争的，
//! 只需一次原子操作即可进入临界区。

use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::VecDeque;

use sync::{BenaphoreMutex, const_mutex};

use crate::config::GLOBAL_LOG_BUFFER_SIZE;
use crate::entry::LogEntry;

struct Ring {
    entries: VecDeque<LogEntry>,
    /// 最旧未读条目的序号
    head: usize,
}

/// 多生产者、单消费者的有界日志缓冲区
pub(crate) struct GlobalLogBuffer {
    ring: BenaphoreMutex<Ring>,
    dropped: AtomicUsize,
}

impl GlobalLogBuffer {
    pub(crate) const fn new() -> Self {
        GlobalLogBuffer {
            ring: const_mutex(Ring {
                entries: VecDeque::new(),
                head: 0,
            }),
            dropped: AtomicUsize::new(0),
        }
    }

    /// 写入一条日志，必要时挤掉最旧的条目
    pub(crate) fn write(&self, entry: &LogEntry) {
        let mut ring = self.ring.lock();
        if ring.entries.len() >= GLOBAL_LOG_BUFFER_SIZE {
            ring.entries.pop_front();
            ring.head += 1;
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        ring.entries.push_back(entry.clone());
    }

    /// 取出最旧的未读条目
    pub(crate) fn read(&self) -> Option<LogEntry> {
        let mut ring = self.ring.lock();
        let entry = ring.entries.pop_front()?;
        ring.head += 1;
        Some(entry)
    }

    /// 按序号查看条目，不移动读指针
    pub(crate) fn peek(&self, index: usize) -> Option<LogEntry> {
        let ring = self.ring.lock();
        index
            .checked_sub(ring.head)
            .and_then(|offset| ring.entries.get(offset))
            .cloned()
    }

    pub(crate) fn reader_index(&self) -> usize {
        self.ring.lock().head
    }

    pub(crate) fn writer_index(&self) -> usize {
        let ring = self.ring.lock();
        ring.head + ring.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.ring.lock().entries.len()
    }

    pub(crate) fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
