//! 测量各种锁在无竞争时的平均加解锁耗时

use std::process::ExitCode;

use harness::config::TIMING_ITERATIONS;
use harness::timing::time_all;
use klog::pr_err;

fn main() -> ExitCode {
    harness::log::init();

    match time_all(TIMING_ITERATIONS) {
        Ok(reports) => {
            for report in reports {
                println!(
                    "{}: the average time of lock is {:e} ns",
                    report.name,
                    report.average.as_nanos() as f64
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            pr_err!("lock timing failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
