//! 可重入 Benaphore 压力测试入口
//!
//! 以默认配置运行完整调度。任何不变式被破坏都会终止进程。

use std::process::ExitCode;

use harness::{StressConfig, run_schedule};
use klog::{pr_err, pr_info};

fn main() -> ExitCode {
    harness::log::init();

    let config = StressConfig::default();
    match run_schedule(&config) {
        Ok(reports) => {
            pr_info!("{} trials passed.", reports.len());
            let summary = harness::log::drain_summary();
            println!(
                "{} log entries written, {} dropped, {} warnings",
                summary.written,
                summary.dropped,
                summary.warnings.len()
            );
            for warning in &summary.warnings {
                println!("  {}", warning);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            pr_err!("stress test aborted: {}", err);
            ExitCode::FAILURE
        }
    }
}
