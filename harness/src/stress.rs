//! 单次试验与完整调度

use std::panic;
use std::thread;

use klog::{pr_info, pr_warn};
use sync::RecursiveBenaphore;

use crate::affinity::pin_current_thread;
use crate::config::{MAX_THREADS, StressConfig, TrialParams};
use crate::log::set_task_id;
use crate::shared::{SharedState, ThreadStats};
use crate::worker::{EXCLUSION_VIOLATED, run_worker};
use crate::{StressError, StressLock};

/// 一次试验的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialReport {
    /// 试验参数
    pub params: TrialParams,
    /// 所有工作线程统计之和
    pub totals: ThreadStats,
    /// 试验结束时共享计数器的值
    pub counter: i64,
}

/// 以全新的 [`RecursiveBenaphore`] 运行一次试验
///
/// 见 [`perform_stress_test_on`]。
pub fn perform_stress_test(
    params: &TrialParams,
    config: &StressConfig,
) -> Result<TrialReport, StressError> {
    perform_stress_test_on(RecursiveBenaphore::new(), params, config)
}

/// 以给定的锁运行一次试验
///
/// 启动 `thread_count` 个工作线程，等待 `duration` 后通知停止并全部 join，
/// 最后检查各线程的贡献之和等于共享计数器。
///
/// # Panics
/// 任一工作线程发现不变式被破坏，或最终求和不一致时 panic。
pub fn perform_stress_test_on<L: StressLock>(
    lock: L,
    params: &TrialParams,
    config: &StressConfig,
) -> Result<TrialReport, StressError> {
    if params.thread_count == 0 || params.thread_count > MAX_THREADS {
        return Err(StressError::ThreadCount {
            requested: params.thread_count,
            max: MAX_THREADS,
        });
    }

    pr_info!(
        "Spawning {} threads {} affinities for {} milliseconds.",
        params.thread_count,
        if params.pin_threads { "with" } else { "without" },
        params.duration.as_millis()
    );

    let shared = SharedState::with_lock(lock);
    let cpus = thread::available_parallelism().map_or(1, |n| n.get());

    let totals = thread::scope(|scope| -> Result<ThreadStats, StressError> {
        let mut workers = Vec::with_capacity(params.thread_count);
        for ordinal in 0..params.thread_count {
            let shared = &shared;
            let spawned = thread::Builder::new()
                .name(format!("stress-{}", ordinal))
                .spawn_scoped(scope, move || {
                    set_task_id(ordinal as u32 + 1);
                    if params.pin_threads {
                        if ordinal < cpus {
                            if let Err(err) = pin_current_thread(ordinal) {
                                pr_warn!("worker {} runs unpinned: {}", ordinal, err);
                            }
                        } else {
                            pr_warn!("worker {} runs unpinned: only {} cpus", ordinal, cpus);
                        }
                    }
                    run_worker(ordinal, shared, config)
                });
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    shared.stop.raise();
                    return Err(StressError::Spawn { ordinal, source });
                }
            }
        }

        thread::sleep(params.duration);
        shared.stop.raise();

        let mut totals = ThreadStats::default();
        for worker in workers {
            match worker.join() {
                Ok(stats) => totals.accumulate(&stats),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        Ok(totals)
    })?;

    let counter = shared.counter.get();
    assert_eq!(
        totals.contributed, counter,
        "{}: per-thread contributions do not add up to the shared counter",
        EXCLUSION_VIOLATED
    );

    pr_info!(
        "{} iterations, {} work units, counter {}",
        totals.iterations,
        totals.work_units,
        counter
    );

    Ok(TrialReport {
        params: *params,
        totals,
        counter,
    })
}

/// 按配置运行完整调度：每轮依次遍历绑核模式与线程数
pub fn run_schedule(config: &StressConfig) -> Result<Vec<TrialReport>, StressError> {
    let mut reports = Vec::new();
    for round in 0..config.rounds {
        pr_info!("Round {} of {}.", round + 1, config.rounds);
        for &pin_threads in &config.pin_modes {
            for thread_count in config.thread_counts.clone() {
                let params = config.trial(thread_count, pin_threads);
                reports.push(perform_stress_test(&params, config)?);
            }
        }
    }
    Ok(reports)
}
