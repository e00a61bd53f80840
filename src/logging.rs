// src/logging.rs

use std::{
    io,
    path::{Path, PathBuf},
};
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_FILE: &str = "process_log.txt";

/// Keeps the run's log sink alive. Dropping it flushes the file and
/// uninstalls the subscriber.
pub struct LogGuard {
    _dispatch: DefaultGuard,
    _worker: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Build the file logger for one run and make it the current subscriber.
///
/// Lines are appended as `<timestamp> <LEVEL> <message> <fields>` without
/// colours. `RUST_LOG` overrides the default `info` filter.
pub fn init(path: impl AsRef<Path>) -> io::Result<LogGuard> {
    let path = path.as_ref().to_path_buf();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .finish();

    let dispatch = tracing::subscriber::set_default(subscriber);
    Ok(LogGuard {
        _dispatch: dispatch,
        _worker: worker,
        path,
    })
}
