use super::*;

#[test]
fn test_entry_round_trip() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    test_log!(log, LogLevel::Info, "trial started");

    assert_eq!(log._log_len(), 1);
    let entry = log._read_log().unwrap();
    assert_eq!(entry.message(), "trial started");
    assert_eq!(entry.level(), LogLevel::Info);
    assert_eq!(log._log_len(), 0);
}

#[test]
fn test_arguments_are_formatted() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    test_log!(log, LogLevel::Notice, "{} threads, counter={}", 3, 1_234);
    test_log!(log, LogLevel::Debug, "token {:#x}", 0x2a);

    assert_eq!(log._read_log().unwrap().message(), "3 threads, counter=1234");
    assert_eq!(log._read_log().unwrap().message(), "token 0x2a");
}

#[test]
fn test_entries_come_out_in_write_order() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    for round in 0..6 {
        test_log!(log, LogLevel::Info, "round {}", round);
    }
    for round in 0..6 {
        let expected = format!("round {}", round);
        assert_eq!(log._read_log().unwrap().message(), expected);
    }
    assert!(log._read_log().is_none());
}

#[test]
fn test_unregistered_context_is_zero() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);
    test_log!(log, LogLevel::Info, "no provider");

    let entry = log._read_log().unwrap();
    assert_eq!(entry.cpu_id(), 0);
    assert_eq!(entry.task_id(), 0);
    assert_eq!(entry.timestamp(), 0);
}
