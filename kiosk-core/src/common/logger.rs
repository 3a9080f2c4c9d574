//! Logging Infrastructure
//!
//! Structured logging setup for the kiosk
//! Features:
//! - Console output, pretty or JSON
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs for session resets and payments (never deleted)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Days an application log file is kept
const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Clean up old application log files (older than 14 days)
///
/// Call this periodically (e.g., daily) to maintain log size
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD (tracing-appender daily naming)
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && let Some(midnight) = naive_date.and_hms_opt(0, 0, 0)
            && let Some(local_datetime) = Local.from_local_datetime(&midnight).single()
            && local_datetime < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to use JSON format on the console
/// * `log_dir` - Optional directory for file logging (e.g., Some("./logs"))
///
/// Must be called from inside a tokio runtime when `log_dir` is set (the
/// cleanup task is spawned on it).
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    };

    let Some(dir) = log_dir else {
        subscriber.with(console_layer).try_init()?;
        return Ok(());
    };

    let log_dir = Path::new(dir);
    let app_log_dir = log_dir.join("app");
    let audit_log_dir = log_dir.join("audit");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;

    // Standard application logs (rotated daily, subject to 14-day cleanup)
    // Everything except the "audit" target
    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let app_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(app_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != "audit"
        }));

    // Permanent audit logs (never deleted)
    let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
    let audit_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_writer(std::sync::Mutex::new(audit_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "audit"
        }));

    tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

    subscriber
        .with(console_layer)
        .with(app_layer)
        .with(audit_layer)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records session resets and payments
///
/// Audit logs are permanently stored under `audit/`; they are never cleaned up.
///
/// # Examples
/// ```ignore
/// audit_log!(epoch, "session_reset", "idle_timeout");
/// audit_log!(epoch, "payment", "approved", format!("total={}", total));
/// ```
#[macro_export]
macro_rules! audit_log {
    ($epoch:expr, $action:expr, $reason:expr) => {
        tracing::info!(
            target: "audit",
            epoch = $epoch,
            action = $action,
            reason = $reason,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($epoch:expr, $action:expr, $reason:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            epoch = $epoch,
            action = $action,
            reason = $reason,
            details = %$details,
            timestamp = chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();

        let old = (chrono::Local::now() - chrono::Duration::days(30)).format("%Y-%m-%d");
        let fresh = chrono::Local::now().format("%Y-%m-%d");
        fs::write(app.join(format!("app.{old}")), "old").unwrap();
        fs::write(app.join(format!("app.{fresh}")), "fresh").unwrap();
        fs::write(app.join("notes.txt"), "keep").unwrap();

        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 1);
        assert!(!app.join(format!("app.{old}")).exists());
        assert!(app.join(format!("app.{fresh}")).exists());
        assert!(app.join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_without_app_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
