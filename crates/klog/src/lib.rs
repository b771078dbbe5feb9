//! 日志子系统
//!
//! 该模块提供一个 **Linux 内核风格的分级日志系统**，供锁的压力测试与计时工具使用。
//!
//! # 组件
//!
//! - `buffer` - 由 Benaphore 互斥锁保护的有界日志缓冲区
//! - `config` - 配置常量（缓冲区大小、消息长度限制、默认级别）
//! - `log_core` - 核心日志实现 (LogCore)
//! - `entry` - 日志条目结构
//! - `level` - 日志级别定义（从 Emergency 到 Debug）
//! - [`macros`] - 面向用户的日志宏 (`pr_info!`, `pr_err!`, 等)
//!
//! # 双输出策略
//!
//! 1. **即时控制台输出**：达到控制台级别阈值的日志会直接写到已注册的 [`LogOutput`]。
//! 2. **缓冲区存储**：达到全局级别阈值的日志都会写入有界缓冲区，供事后读取。
//!
//! # 解耦
//!
//! - **LogContextProvider**：提供 CPU ID、任务 ID、时间戳
//! - **LogOutput**：提供控制台输出能力
//!
//! 使用方在启动时注册这些 trait 的实现；未注册时上下文为 0，且不产生控制台输出。

mod buffer;
mod config;
mod entry;
mod level;
mod log_core;
pub mod macros;

pub use config::{
    DEFAULT_CONSOLE_LEVEL, DEFAULT_LOG_LEVEL, GLOBAL_LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH,
};
pub use entry::LogEntry;
pub use level::LogLevel;
pub use log_core::{LogCore, format_log_entry};

use std::sync::OnceLock;

// ========== Trait 定义 ==========

/// 日志上下文提供者 trait
///
/// 实现此 trait 以提供日志所需的上下文信息（CPU ID、任务 ID、时间戳）。
pub trait LogContextProvider: Send + Sync {
    /// 获取当前 CPU ID
    fn cpu_id(&self) -> usize;
    /// 获取当前任务 ID（没有任务时返回 0）
    fn task_id(&self) -> u32;
    /// 获取当前时间戳
    fn timestamp(&self) -> usize;
}

/// 日志输出 trait
pub trait LogOutput: Send + Sync {
    /// 输出字符串到控制台
    fn write_str(&self, s: &str);
}

// ========== 全局注册机制 ==========

static CONTEXT_PROVIDER: OnceLock<&'static dyn LogContextProvider> = OnceLock::new();
static LOG_OUTPUT: OnceLock<&'static dyn LogOutput> = OnceLock::new();

/// 注册日志上下文提供者
///
/// 只有第一次注册生效；返回本次注册是否生效。
pub fn register_context_provider(provider: &'static dyn LogContextProvider) -> bool {
    CONTEXT_PROVIDER.set(provider).is_ok()
}

/// 注册日志输出
///
/// 只有第一次注册生效；返回本次注册是否生效。
pub fn register_log_output(output: &'static dyn LogOutput) -> bool {
    LOG_OUTPUT.set(output).is_ok()
}

pub(crate) fn get_context_provider() -> Option<&'static dyn LogContextProvider> {
    CONTEXT_PROVIDER.get().copied()
}

pub(crate) fn get_log_output() -> Option<&'static dyn LogOutput> {
    LOG_OUTPUT.get().copied()
}

// ========== 全局单例 ==========

static GLOBAL_LOG: LogCore = LogCore::default();

// ========== 公共 API ==========

/// 核心日志实现（由宏调用）
#[doc(hidden)]
pub fn log_impl(level: LogLevel, args: core::fmt::Arguments<'_>) {
    GLOBAL_LOG._log(level, args);
}

/// 检查日志级别是否启用（由宏调用）
#[doc(hidden)]
pub fn is_level_enabled(level: LogLevel) -> bool {
    level as u8 <= GLOBAL_LOG._get_global_level() as u8
}

/// 从缓冲区读取下一个日志条目
pub fn read_log() -> Option<LogEntry> {
    GLOBAL_LOG._read_log()
}

/// 获取下一条日志将使用的序号
pub fn log_writer_index() -> usize {
    GLOBAL_LOG._log_writer_index()
}

/// 返回未读日志条目的数量
pub fn log_len() -> usize {
    GLOBAL_LOG._log_len()
}

/// 返回已丢弃日志的计数
pub fn log_dropped_count() -> usize {
    GLOBAL_LOG._log_dropped_count()
}

/// 设置全局日志级别阈值
pub fn set_global_level(level: LogLevel) {
    GLOBAL_LOG._set_global_level(level);
}

/// 获取当前全局日志级别
pub fn get_global_level() -> LogLevel {
    GLOBAL_LOG._get_global_level()
}

/// 设置控制台输出级别阈值
pub fn set_console_level(level: LogLevel) {
    GLOBAL_LOG._set_console_level(level);
}

/// 获取当前控制台输出级别
pub fn get_console_level() -> LogLevel {
    GLOBAL_LOG._get_console_level()
}

#[cfg(test)]
mod tests;
