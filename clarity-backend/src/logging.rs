/// Backend logger: env_logger with an `info` default, overridable via RUST_LOG.
use env_logger::{Builder, Env};
use log::SetLoggerError;
use std::io::Write;

const DEFAULT_FILTER: &str = "info";

pub fn init() -> Result<(), SetLoggerError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            buf.timestamp_millis(),
            record.level(),
            record.target(),
            record.args().to_string().replace('\n', "\\n")
        )
    });
    builder.try_init()
}

/// Last-resort line on stderr when the logger itself could not be set up.
pub fn write_fallback_line(message: &str) {
    let timestamp_ms = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    eprintln!("{} [ERROR] [clarity.logging] {}", timestamp_ms, message);
}
