//! Benaphore 压力测试与计时工具
//!
//! 压力测试是可重入 Benaphore 正确性的判定依据：多个工作线程共享同一把锁和同一个计数器，
//! 按随机的深度与获取方式反复加锁，只有互斥真正成立时计数器的不变式才能保持。
//!
//! # 模块
//!
//! - [`config`] - 常量与 [`StressConfig`]
//! - [`shared`] - 工作线程共享的状态记录与每线程统计
//! - [`StressLock`] - 被测锁需要提供的接口
//! - [`stress`] - 单次试验与完整调度
//! - [`timing`] - 无竞争加解锁耗时测量
//! - [`affinity`] - 线程绑核
//! - [`log`] - 日志上下文与输出的注册
//!
//! # 失败方式
//!
//! 不变式被破坏时工作线程直接 panic；协调线程在 join 时重新抛出该 panic。
//! release 构建使用 `panic = "abort"`，因此失败会立即终止进程并保留现场。

pub mod affinity;
pub mod config;
mod error;
mod lock;
pub mod log;
pub mod shared;
pub mod stress;
pub mod timing;
mod worker;

pub use config::{MAX_THREADS, StressConfig, TrialParams};
pub use error::StressError;
pub use lock::StressLock;
pub use shared::{SharedCounter, SharedState, StopSignal, ThreadStats};
pub use stress::{TrialReport, perform_stress_test, perform_stress_test_on, run_schedule};
