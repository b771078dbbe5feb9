//! 压力测试配置
//!
//! 没有命令行参数、配置文件或环境变量；入口程序使用 [`StressConfig::default`]，
//! 测试则构造更短的配置。

use core::ops::RangeInclusive;
use core::time::Duration;

/// 同时运行的工作线程上限
pub const MAX_THREADS: usize = 4;

/// 完整调度重复的轮数
pub const DEFAULT_ROUNDS: usize = 10;

/// 每次试验的运行时长
pub const DEFAULT_TRIAL_DURATION: Duration = Duration::from_millis(2000);

/// 目标深度 `floor(f² * DEPTH_SCALE)` 的缩放系数，结果落在 `0..=3`，偏向 0
pub const DEPTH_SCALE: f32 = 4.0;

/// 每轮不持锁工作量的泊松均值（单位：随机数生成次数）
pub const DEFAULT_MEAN_WORK_UNITS: f32 = 4.5;

/// 每轮不持锁工作量的上限
pub const DEFAULT_MAX_WORK_UNITS: u64 = 64;

/// 计时工具的加解锁次数
pub const TIMING_ITERATIONS: u32 = 1_000_000;

/// 压力测试调度配置
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// 整个调度重复的轮数
    pub rounds: usize,
    /// 每轮依次尝试的线程数
    pub thread_counts: RangeInclusive<usize>,
    /// 每轮依次尝试的绑核模式（`true` 表示绑核）
    pub pin_modes: Vec<bool>,
    /// 每次试验的运行时长
    pub duration: Duration,
    /// 不持锁工作量的泊松均值
    pub mean_work_units: f32,
    /// 不持锁工作量的上限
    pub max_work_units: u64,
    /// 随机种子基数，工作线程 `i` 使用 `seed + i`
    pub seed: u32,
}

impl Default for StressConfig {
    fn default() -> Self {
        StressConfig {
            rounds: DEFAULT_ROUNDS,
            thread_counts: 2..=MAX_THREADS,
            pin_modes: vec![true, false],
            duration: DEFAULT_TRIAL_DURATION,
            mean_work_units: DEFAULT_MEAN_WORK_UNITS,
            max_work_units: DEFAULT_MAX_WORK_UNITS,
            seed: 0,
        }
    }
}

impl StressConfig {
    /// 以本配置的时长构造一次试验的参数
    pub fn trial(&self, thread_count: usize, pin_threads: bool) -> TrialParams {
        TrialParams {
            thread_count,
            pin_threads,
            duration: self.duration,
        }
    }
}

/// 单次试验的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialParams {
    /// 工作线程数，`1..=MAX_THREADS`
    pub thread_count: usize,
    /// 是否把第 `i` 个工作线程绑定到第 `i` 个 CPU
    pub pin_threads: bool,
    /// 协调线程在发出停止信号前等待的时长
    pub duration: Duration,
}
