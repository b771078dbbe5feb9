use super::*;
use crate::{MAX_LOG_MESSAGE_LENGTH, format_log_entry};

#[test]
fn test_long_message_is_truncated() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    let long = "x".repeat(MAX_LOG_MESSAGE_LENGTH + 40);
    test_log!(log, LogLevel::Info, "{}", long);

    let entry = log._read_log().unwrap();
    assert_eq!(entry.message().len(), MAX_LOG_MESSAGE_LENGTH);
}

#[test]
fn test_truncation_respects_char_boundaries() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);

    // Three-byte characters never divide MAX_LOG_MESSAGE_LENGTH evenly.
    let wide = "锁".repeat(MAX_LOG_MESSAGE_LENGTH);
    test_log!(log, LogLevel::Info, "{}", wide);

    let message = log._read_log().unwrap().message().to_owned();
    assert!(!message.is_empty());
    assert!(message.len() <= MAX_LOG_MESSAGE_LENGTH);
    assert!(message.chars().all(|c| c == '锁'));
}

#[test]
fn test_formatted_line_layout() {
    let log = LogCore::new(LogLevel::Debug, LogLevel::Emergency);
    test_log!(log, LogLevel::Error, "sum mismatch");

    let line = format_log_entry(&log._read_log().unwrap());
    assert!(line.starts_with(LogLevel::Error.color_code()));
    assert!(line.contains("[ERR]"));
    assert!(line.contains("[CPU0/T  0]"));
    assert!(line.ends_with("sum mismatch\x1b[0m"));
}
