//! 日志系统核心实现
//!
//! 该模块将所有日志状态和逻辑封装到一个单独的 `LogCore` 结构体中，
//! 既可以作为全局单例，也可以独立实例化用于测试。

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::buffer::GlobalLogBuffer;
use crate::config::{DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL};
use crate::entry::LogEntry;
use crate::level::LogLevel;

/// 核心日志系统
///
/// 封装了日志缓冲区和两个过滤阈值：
/// - 全局级别：决定日志是否进入缓冲区
/// - 控制台级别：决定日志是否立即打印
pub struct LogCore {
    buffer: GlobalLogBuffer,
    global_level: AtomicU8,
    console_level: AtomicU8,
}

impl LogCore {
    /// 使用默认日志级别创建 LogCore，可用于 `static` 初始化
    ///
    /// ```rust
    /// use klog::LogCore;
    ///
    /// static GLOBAL_LOG: LogCore = LogCore::default();
    /// let _ = &GLOBAL_LOG;
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub const fn default() -> Self {
        Self {
            buffer: GlobalLogBuffer::new(),
            global_level: AtomicU8::new(DEFAULT_LOG_LEVEL as u8),
            console_level: AtomicU8::new(DEFAULT_CONSOLE_LEVEL as u8),
        }
    }

    /// 使用自定义日志级别创建 LogCore
    ///
    /// ```rust
    /// use klog::{LogCore, LogLevel};
    ///
    /// let _test_log = LogCore::new(LogLevel::Debug, LogLevel::Warning);
    /// ```
    pub fn new(global_level: LogLevel, console_level: LogLevel) -> Self {
        Self {
            buffer: GlobalLogBuffer::new(),
            global_level: AtomicU8::new(global_level as u8),
            console_level: AtomicU8::new(console_level as u8),
        }
    }

    /// 核心日志记录实现
    ///
    /// 1. 按全局级别过滤
    /// 2. 通过已注册的 provider 收集上下文（未注册时全部为 0）
    /// 3. 写入缓冲区
    /// 4. 达到控制台级别时立即输出
    pub fn _log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.is_level_enabled(level) {
            return;
        }

        let (cpu_id, task_id, timestamp) = match crate::get_context_provider() {
            Some(provider) => (provider.cpu_id(), provider.task_id(), provider.timestamp()),
            None => (0, 0, 0),
        };

        let entry = LogEntry::from_args(level, cpu_id, task_id, timestamp, args);
        self.buffer.write(&entry);

        if self.is_console_level(level) {
            self.direct_print_entry(&entry);
        }
    }

    /// 从缓冲区读取下一个日志条目
    pub fn _read_log(&self) -> Option<LogEntry> {
        self.buffer.read()
    }

    /// 非破坏性读取：按序号 peek 日志条目，不移动读指针
    pub fn _peek_log(&self, index: usize) -> Option<LogEntry> {
        self.buffer.peek(index)
    }

    /// 获取当前可读取的起始序号
    pub fn _log_reader_index(&self) -> usize {
        self.buffer.reader_index()
    }

    /// 获取下一条日志将使用的序号
    pub fn _log_writer_index(&self) -> usize {
        self.buffer.writer_index()
    }

    /// 返回未读日志条目的数量
    pub fn _log_len(&self) -> usize {
        self.buffer.len()
    }

    /// 返回由于缓冲区溢出而丢弃的日志计数
    pub fn _log_dropped_count(&self) -> usize {
        self.buffer.dropped_count()
    }

    /// 设置全局日志级别阈值
    pub fn _set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前全局日志级别
    pub fn _get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Acquire))
    }

    /// 设置控制台输出级别阈值
    pub fn _set_console_level(&self, level: LogLevel) {
        self.console_level.store(level as u8, Ordering::Release);
    }

    /// 获取当前控制台输出级别
    pub fn _get_console_level(&self) -> LogLevel {
        LogLevel::from_u8(self.console_level.load(Ordering::Acquire))
    }

    // ========== 内部辅助函数 ==========

    #[inline(always)]
    fn is_level_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.global_level.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn is_console_level(&self, level: LogLevel) -> bool {
        level as u8 <= self.console_level.load(Ordering::Acquire)
    }

    fn direct_print_entry(&self, entry: &LogEntry) {
        if let Some(output) = crate::get_log_output() {
            let mut line = format_log_entry(entry);
            line.push('\n');
            output.write_str(&line);
        }
    }
}

/// 格式化日志条目为字符串（带 ANSI 颜色和上下文信息）
///
/// # 格式
/// ```text
/// <color_code>[LEVEL] [timestamp] [CPU<id>/T<tid>] message<reset>
/// ```
pub fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "{}{} [{:12}] [CPU{}/T{:3}] {}{}",
        entry.level().color_code(),
        entry.level().as_str(),
        entry.timestamp(),
        entry.cpu_id(),
        entry.task_id(),
        entry.message(),
        entry.level().reset_color_code()
    )
}
