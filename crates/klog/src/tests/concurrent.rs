use super::*;
use std::thread;

#[test]
fn test_concurrent_writers_lose_nothing_but_overflow() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);
    const THREADS: usize = 4;
    const PER_THREAD: usize = 50;

    thread::scope(|s| {
        for t in 0..THREADS {
            let log = &log;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    test_log!(log, LogLevel::Info, "worker {} line {}", t, i);
                }
            });
        }
    });

    assert_eq!(
        log._log_len() + log._log_dropped_count(),
        THREADS * PER_THREAD
    );
    assert_eq!(log._log_writer_index(), THREADS * PER_THREAD);
}
