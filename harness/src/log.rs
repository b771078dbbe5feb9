//! 日志接入
//!
//! 为 klog 注册压力测试进程的上下文提供者和标准输出。
//! 任务 ID 为工作线程序号加一，协调线程为 0。

use std::cell::Cell;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use klog::{LogContextProvider, LogLevel, LogOutput};

thread_local! {
    static TASK_ID: Cell<u32> = const { Cell::new(0) };
}

static START: OnceLock<Instant> = OnceLock::new();

/// 设置当前线程在日志中显示的任务 ID
pub fn set_task_id(id: u32) {
    TASK_ID.with(|task| task.set(id));
}

/// 压力测试进程的日志上下文提供者
struct HarnessContextProvider;

impl LogContextProvider for HarnessContextProvider {
    fn cpu_id(&self) -> usize {
        current_cpu()
    }

    fn task_id(&self) -> u32 {
        TASK_ID.with(|task| task.get())
    }

    /// 自进程初始化日志以来的微秒数
    fn timestamp(&self) -> usize {
        START.get_or_init(Instant::now).elapsed().as_micros() as usize
    }
}

#[cfg(target_os = "linux")]
fn current_cpu() -> usize {
    // SAFETY: sched_getcpu 没有前置条件
    let cpu = unsafe { libc::sched_getcpu() };
    usize::try_from(cpu).unwrap_or(0)
}

#[cfg(not(target_os = "linux"))]
fn current_cpu() -> usize {
    0
}

/// 写到标准输出
struct StdoutOutput;

impl LogOutput for StdoutOutput {
    fn write_str(&self, s: &str) {
        let _ = std::io::stdout().lock().write_all(s.as_bytes());
    }
}

static HARNESS_CONTEXT_PROVIDER: HarnessContextProvider = HarnessContextProvider;
static STDOUT_OUTPUT: StdoutOutput = StdoutOutput;

/// 初始化日志系统
///
/// 可重复调用，只有第一次注册生效。
pub fn init() {
    START.get_or_init(Instant::now);
    klog::register_context_provider(&HARNESS_CONTEXT_PROVIDER);
    klog::register_log_output(&STDOUT_OUTPUT);
}

/// 缓冲日志的汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogSummary {
    /// 进程启动以来写入缓冲区的条目数
    pub written: usize,
    /// 因缓冲区满而被挤掉的条目数
    pub dropped: usize,
    /// 清空时仍在缓冲区中的 Warning 及更严重的消息
    pub warnings: Vec<String>,
}

/// 清空日志缓冲区并汇总其内容
pub fn drain_summary() -> LogSummary {
    let mut summary = LogSummary {
        written: klog::log_writer_index(),
        dropped: klog::log_dropped_count(),
        warnings: Vec::new(),
    };
    while let Some(entry) = klog::read_log() {
        if entry.level() <= LogLevel::Warning {
            summary.warnings.push(entry.message().to_string());
        }
    }
    summary
}
