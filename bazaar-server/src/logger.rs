//! Logging infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and `shared`. With a log directory, output goes to a daily rolling
//! file instead of stdout.

use std::path::Path;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Install the global subscriber
pub fn init_logger(log_level: &str, json: bool, log_dir: Option<&str>) -> Result<(), BoxError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bazaar_server={log_level},shared={log_level}").into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = match log_dir {
        Some(dir) => {
            let path = Path::new(dir);
            std::fs::create_dir_all(path)?;
            Some(tracing_appender::rolling::daily(path, "bazaar-server"))
        }
        None => None,
    };

    match (json, file_appender) {
        (true, Some(appender)) => builder.json().with_writer(appender).try_init()?,
        (true, None) => builder.json().try_init()?,
        (false, Some(appender)) => builder.with_ansi(false).with_writer(appender).try_init()?,
        (false, None) => builder.try_init()?,
    }
    Ok(())
}
