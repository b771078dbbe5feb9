//! Mock 实现模块
//!
//! 提供各种同步原语的 Mock 实现，用于测试

pub mod signal;
