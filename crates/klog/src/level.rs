//! 日志级别定义
//!
//! 与 Linux 内核 printk 的八个级别一一对应，数值越小越紧急。

/// 日志级别（从 Emergency 到 Debug）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// 系统不可用
    Emergency = 0,
    /// 必须立即处理
    Alert = 1,
    /// 严重情况
    Critical = 2,
    /// 错误
    Error = 3,
    /// 警告
    Warning = 4,
    /// 正常但值得注意
    Notice = 5,
    /// 信息
    Info = 6,
    /// 调试
    Debug = 7,
}

impl LogLevel {
    /// 从数值恢复级别，超出范围的值视为 Debug
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Emergency,
            1 => LogLevel::Alert,
            2 => LogLevel::Critical,
            3 => LogLevel::Error,
            4 => LogLevel::Warning,
            5 => LogLevel::Notice,
            6 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    /// 输出时使用的级别标签
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Emergency => "[EMERG]",
            LogLevel::Alert => "[ALERT]",
            LogLevel::Critical => "[CRIT]",
            LogLevel::Error => "[ERR]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Notice => "[NOTICE]",
            LogLevel::Info => "[INFO]",
            LogLevel::Debug => "[DEBUG]",
        }
    }

    /// 级别对应的 ANSI 颜色
    pub const fn color_code(self) -> &'static str {
        match self {
            LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical => "\x1b[1;31m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Warning => "\x1b[93m",
            LogLevel::Notice => "\x1b[32m",
            LogLevel::Info => "\x1b[37m",
            LogLevel::Debug => "\x1b[90m",
        }
    }

    /// 恢复默认颜色
    pub const fn reset_color_code(self) -> &'static str {
        "\x1b[0m"
    }
}
