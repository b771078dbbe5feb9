//! 日志条目
//!
//! 消息以定长字节数组内联保存，写入缓冲区时不需要额外分配。

use core::fmt::{self, Write};

use crate::config::MAX_LOG_MESSAGE_LENGTH;
use crate::level::LogLevel;

/// 一条日志记录
#[derive(Clone)]
pub struct LogEntry {
    level: LogLevel,
    cpu_id: usize,
    task_id: u32,
    timestamp: usize,
    length: usize,
    message: [u8; MAX_LOG_MESSAGE_LENGTH],
}

/// 写满后静默丢弃剩余内容的写入器，只在 UTF-8 字符边界截断
struct TruncatingWriter<'a> {
    buf: &'a mut [u8; MAX_LOG_MESSAGE_LENGTH],
    length: usize,
}

impl Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MAX_LOG_MESSAGE_LENGTH - self.length;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.length..self.length + take].copy_from_slice(&s.as_bytes()[..take]);
        self.length += take;
        Ok(())
    }
}

impl LogEntry {
    /// 由格式化参数构造日志条目
    pub fn from_args(
        level: LogLevel,
        cpu_id: usize,
        task_id: u32,
        timestamp: usize,
        args: fmt::Arguments<'_>,
    ) -> Self {
        let mut message = [0u8; MAX_LOG_MESSAGE_LENGTH];
        let mut writer = TruncatingWriter {
            buf: &mut message,
            length: 0,
        };
        // TruncatingWriter 从不返回错误
        let _ = writer.write_fmt(args);
        let length = writer.length;
        LogEntry {
            level,
            cpu_id,
            task_id,
            timestamp,
            length,
            message,
        }
    }

    /// 日志级别
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 记录日志的 CPU
    pub fn cpu_id(&self) -> usize {
        self.cpu_id
    }

    /// 记录日志的任务（压力测试中为工作线程序号）
    pub fn task_id(&self) -> u32 {
        self.task_id
    }

    /// 时间戳
    pub fn timestamp(&self) -> usize {
        self.timestamp
    }

    /// 消息文本
    pub fn message(&self) -> &str {
        // 只在字符边界截断，内容一定是合法 UTF-8
        core::str::from_utf8(&self.message[..self.length]).unwrap_or("")
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("level", &self.level)
            .field("cpu_id", &self.cpu_id)
            .field("task_id", &self.task_id)
            .field("timestamp", &self.timestamp)
            .field("message", &self.message())
            .finish()
    }
}
