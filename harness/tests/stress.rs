//! 压力测试的集成测试
//!
//! 这里的试验比默认配置短得多，只验证求和不变式在各种线程数与绑核模式下成立。

use std::time::Duration;

use harness::{MAX_THREADS, StressConfig, StressError, TrialParams, perform_stress_test, run_schedule};

fn short_config(millis: u64) -> StressConfig {
    StressConfig {
        rounds: 1,
        duration: Duration::from_millis(millis),
        ..StressConfig::default()
    }
}

#[test]
fn test_short_schedule_passes() {
    harness::log::init();
    let config = short_config(200);
    let reports = run_schedule(&config).unwrap();
    assert_eq!(reports.len(), 2 * (MAX_THREADS - 1));
    for report in &reports {
        assert!(report.totals.iterations > 0);
        assert_eq!(report.totals.contributed, report.counter);
    }
}

#[test]
fn test_full_length_three_thread_trial() {
    let config = StressConfig::default();
    let params = TrialParams {
        thread_count: 3,
        pin_threads: false,
        duration: Duration::from_millis(2000),
    };
    let report = perform_stress_test(&params, &config).unwrap();
    assert_eq!(report.params, params);
    assert_eq!(report.totals.contributed, report.counter);
    assert!(report.counter > 0);
}

#[test]
fn test_single_thread_trial() {
    let config = short_config(100);
    let report = perform_stress_test(&config.trial(1, false), &config).unwrap();
    assert_eq!(report.totals.contributed, report.counter);
}

#[test]
fn test_thread_count_out_of_range() {
    let config = short_config(10);
    for requested in [0, MAX_THREADS + 1] {
        let err = perform_stress_test(&config.trial(requested, false), &config).unwrap_err();
        assert!(matches!(
            err,
            StressError::ThreadCount { requested: r, max } if r == requested && max == MAX_THREADS
        ));
    }
}

#[test]
fn test_seeded_pinned_trial() {
    let config = StressConfig {
        seed: 12345,
        ..short_config(100)
    };
    let report = perform_stress_test(&config.trial(4, true), &config).unwrap();
    assert_eq!(report.totals.contributed, report.counter);
}
