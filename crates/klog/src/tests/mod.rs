// Unit tests for klog.
//
// These exercise a local `LogCore` instance so the global singleton stays untouched.

use crate::LogLevel;
use crate::log_core::LogCore;

/// Test-only logging helper (mirrors production macro behavior, but targets a local `LogCore`).
macro_rules! test_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger._log($level, format_args!($($arg)*))
    };
}

mod basic;
mod concurrent;
mod format;
