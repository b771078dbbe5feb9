//! 同步原语错误类型
//!
//! 锁本身不会失败；唯一可恢复的错误来自底层阻塞信号的初始化。

use core::fmt;

/// 同步原语错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// 阻塞信号初始化失败（`sem_init` 返回的 errno）
    SignalInit {
        /// 系统错误码
        errno: i32,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::SignalInit { errno } => {
                write!(f, "failed to initialize blocking signal (errno {})", errno)
            }
        }
    }
}

impl std::error::Error for SyncError {}
