// Logging
// One log file per session plus an optional console layer.
//
// Environment:
//   AUTHENTIAI_LOG_DIR              directory for session files
//   AUTHENTIAI_DISABLE_FILE_LOG     console only
//   AUTHENTIAI_DISABLE_LOG_CLEANUP  keep every old session file
//   RUST_LOG                        filter, default "info"

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Local};
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub const LOG_PREFIX: &str = "authentiai_";
pub const LOGS_TO_KEEP: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// `None` disables the session file.
    pub dir: Option<PathBuf>,
    pub cleanup: bool,
    pub keep: usize,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| matches!(lookup(name).as_deref(), Some("1" | "true" | "TRUE"));

        let dir = if flag("AUTHENTIAI_DISABLE_FILE_LOG") {
            None
        } else {
            Some(
                lookup("AUTHENTIAI_LOG_DIR")
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(default_dir),
            )
        };

        Self {
            dir,
            cleanup: !flag("AUTHENTIAI_DISABLE_LOG_CLEANUP"),
            keep: LOGS_TO_KEEP,
        }
    }
}

fn default_dir() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("logs");
    }
    dirs::data_local_dir()
        .map(|d| d.join("authentiai").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn session_file_name(started: DateTime<Local>) -> String {
    format!("{}{}.log", LOG_PREFIX, started.format("%Y%m%d_%H%M%S"))
}

struct SessionFile {
    path: PathBuf,
    writer: NonBlocking,
}

fn open_session_file(dir: &Path) -> std::io::Result<SessionFile> {
    fs::create_dir_all(dir)?;
    let name = session_file_name(Local::now());
    let (writer, guard) = tracing_appender::non_blocking(rolling::never(dir, &name));
    let _ = LOG_GUARD.set(guard);
    Ok(SessionFile {
        path: dir.join(name),
        writer,
    })
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let session = settings.dir.as_deref().and_then(|dir| match open_session_file(dir) {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!("Failed to create logs directory {}: {}", dir.display(), e);
            None
        }
    });
    let log_path = session.as_ref().map(|s| s.path.clone());

    let file_layer = session.map(|s| {
        fmt::layer()
            .with_writer(s.writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    // Release builds only write to the console when there is no file.
    let console_layer = (cfg!(debug_assertions) || log_path.is_none()).then(|| {
        let writer = if cfg!(debug_assertions) {
            BoxMakeWriter::new(std::io::stdout)
        } else {
            BoxMakeWriter::new(std::io::stderr)
        };
        fmt::layer()
            .with_writer(writer)
            .with_ansi(cfg!(debug_assertions))
            .with_target(true)
    });

    if tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_err()
    {
        return;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "=== AuthentiAI Started ===");
    match (&log_path, &settings.dir) {
        (Some(path), _) => info!(path = %path.display(), "logging.file"),
        (None, Some(_)) => info!("Falling back to console-only logging (log dir not writable)"),
        (None, None) => info!("File logging disabled via AUTHENTIAI_DISABLE_FILE_LOG"),
    }

    if let (true, Some(path)) = (settings.cleanup, log_path) {
        let keep = settings.keep;
        std::thread::spawn(move || {
            if let Some(dir) = path.parent() {
                cleanup_old_logs(dir, keep);
            }
        });
    }
}

/// Delete all but the `keep` newest session files. Names sort by start time.
pub fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut sessions: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(LOG_PREFIX) && n.ends_with(".log"))
        })
        .collect();

    if sessions.len() <= keep {
        return;
    }
    sessions.sort();
    let stale = sessions.len() - keep;
    for path in sessions.into_iter().take(stale) {
        let _ = fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        LogSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_settings_defaults() {
        let settings = settings_from(&[]);
        assert_eq!(settings.dir, Some(default_dir()));
        assert!(settings.cleanup);
        assert_eq!(settings.keep, LOGS_TO_KEEP);
    }

    #[test]
    fn test_settings_env_overrides() {
        let settings = settings_from(&[
            ("AUTHENTIAI_LOG_DIR", "/var/log/authentiai"),
            ("AUTHENTIAI_DISABLE_LOG_CLEANUP", "1"),
        ]);
        assert_eq!(settings.dir, Some(PathBuf::from("/var/log/authentiai")));
        assert!(!settings.cleanup);

        let blank = settings_from(&[("AUTHENTIAI_LOG_DIR", "  ")]);
        assert_eq!(blank.dir, Some(default_dir()));
    }

    #[test]
    fn test_disable_file_log() {
        let settings = settings_from(&[
            ("AUTHENTIAI_DISABLE_FILE_LOG", "true"),
            ("AUTHENTIAI_LOG_DIR", "/tmp/ignored"),
        ]);
        assert_eq!(settings.dir, None);

        let not_a_flag = settings_from(&[("AUTHENTIAI_DISABLE_FILE_LOG", "yes")]);
        assert!(not_a_flag.dir.is_some());
    }

    #[test]
    fn test_session_file_name() {
        let started = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(session_file_name(started), "authentiai_20260307_090501.log");
    }

    #[test]
    fn test_cleanup_keeps_most_recent_logs() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=5 {
            fs::write(dir.path().join(format!("{}2026010{}_000000.log", LOG_PREFIX, day)), "x").unwrap();
        }
        fs::write(dir.path().join("unrelated.log"), "x").unwrap();

        cleanup_old_logs(dir.path(), 2);

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with(LOG_PREFIX))
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            ["authentiai_20260104_000000.log", "authentiai_20260105_000000.log"]
        );
        assert!(dir.path().join("unrelated.log").exists());
    }

    #[test]
    fn test_cleanup_ignores_missing_dir() {
        cleanup_old_logs(Path::new("/nonexistent/authentiai/logs"), 1);
    }
}
