//! 压力测试错误类型
//!
//! 只覆盖环境问题（线程、绑核、信号初始化）。不变式被破坏不是错误，而是 panic。

use core::fmt;
use std::io;

use sync::SyncError;

/// 压力测试错误类型
#[derive(Debug)]
pub enum StressError {
    /// 请求的线程数不在 `1..=max` 范围内
    ThreadCount {
        /// 请求的线程数
        requested: usize,
        /// 允许的最大线程数
        max: usize,
    },
    /// 创建工作线程失败
    Spawn {
        /// 工作线程序号
        ordinal: usize,
        /// 底层 I/O 错误
        source: io::Error,
    },
    /// 绑核失败
    Affinity {
        /// 目标 CPU
        cpu: usize,
        /// 系统错误码
        errno: i32,
    },
    /// 当前平台不支持绑核
    AffinityUnsupported,
    /// 阻塞信号初始化失败
    Signal(SyncError),
}

impl fmt::Display for StressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StressError::ThreadCount { requested, max } => {
                write!(f, "thread count {} outside 1..={}", requested, max)
            }
            StressError::Spawn { ordinal, source } => {
                write!(f, "failed to spawn worker {}: {}", ordinal, source)
            }
            StressError::Affinity { cpu, errno } => {
                write!(f, "failed to pin thread to cpu {} (errno {})", cpu, errno)
            }
            StressError::AffinityUnsupported => {
                write!(f, "thread affinity is not supported on this platform")
            }
            StressError::Signal(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StressError::Spawn { source, .. } => Some(source),
            StressError::Signal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SyncError> for StressError {
    fn from(err: SyncError) -> Self {
        StressError::Signal(err)
    }
}
