//! 面向用户的日志宏
//!
//! 级别检查在格式化之前完成，被过滤的日志不会计算格式化参数。

/// 带有级别过滤的内部实现宏
#[doc(hidden)]
#[macro_export]
macro_rules! __log_impl_filtered {
    ($level:expr, $args:expr) => {
        if $crate::is_level_enabled($level) {
            $crate::log_impl($level, $args);
        }
    };
}

/// 以 **EMERGENCY** 级别记录消息
#[macro_export]
macro_rules! pr_emerg {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Emergency, format_args!($($arg)*))
    };
}

/// 以 **ALERT** 级别记录消息
#[macro_export]
macro_rules! pr_alert {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Alert, format_args!($($arg)*))
    };
}

/// 以 **CRITICAL** 级别记录消息
#[macro_export]
macro_rules! pr_crit {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Critical, format_args!($($arg)*))
    };
}

/// 以 **ERROR** 级别记录消息
#[macro_export]
macro_rules! pr_err {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Error, format_args!($($arg)*))
    };
}

/// 以 **WARNING** 级别记录消息
#[macro_export]
macro_rules! pr_warn {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Warning, format_args!($($arg)*))
    };
}

/// 以 **NOTICE** 级别记录消息
#[macro_export]
macro_rules! pr_notice {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Notice, format_args!($($arg)*))
    };
}

/// 以 **INFO** 级别记录消息
#[macro_export]
macro_rules! pr_info {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Info, format_args!($($arg)*))
    };
}

/// 以 **DEBUG** 级别记录消息
#[macro_export]
macro_rules! pr_debug {
    ($($arg:tt)*) => {
        $crate::__log_impl_filtered!($crate::LogLevel::Debug, format_args!($($arg)*))
    };
}
