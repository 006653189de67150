use packhub_logger::{LevelFilter, LogFormat, Logger};

#[test]
fn console_only_logger_has_no_file_guard() {
    let logger = Logger::builder()
        .name("integration-console-only")
        .format(LogFormat::Json)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    tracing::info!(bundle = "main", "console line");
    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
}
