use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::atomic::{AtomicUsize, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::Metadata;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    prelude::*,
};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    Daily,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default directive when `RUST_LOG` is unset.
    pub level: String,

    /// `None` puts logs under `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,

    pub file_prefix: String,

    pub rotation: LogRotation,

    pub max_log_files: usize,

    /// Mirror events to stderr.
    pub stderr: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "vault".to_string(),
            rotation: LogRotation::Daily,
            max_log_files: 10,
            stderr: false,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn resolve_dir(&self, data_dir: &Path) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("logs"))
    }
}

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`. Keep the guard alive until
    /// exit so buffered lines reach the file.
    pub fn init(config: &LoggerConfig, data_dir: &Path) -> AppResult<WorkerGuard> {
        let log_dir = config.resolve_dir(data_dir);
        std::fs::create_dir_all(&log_dir)?;

        let rotation = match config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(config.file_prefix.as_str())
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(&log_dir)
            .map_err(|e| AppError::Other(format!("Failed to create file appender: {e}")))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::layer()
            .event_format(SeqFormat)
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(make_filter(&config.level)?);

        let stderr_filter = make_filter(&config.level)?;
        let stderr_layer = config.stderr.then(|| {
            fmt::layer()
                .event_format(SeqFormat)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_filter(stderr_filter)
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .map_err(|e| AppError::Other(format!("Failed to install tracing subscriber: {e}")))?;

        Ok(guard)
    }
}

fn make_filter(level: &str) -> AppResult<EnvFilter> {
    let directive = Directive::from_str(level)
        .map_err(|e| AppError::invalid_input("logging.level", e.to_string()))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFormat;

impl<S, N> FormatEvent<S, N> for SeqFormat
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically-increasing sequence number
        let seq: usize = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_seq_format_line_shape() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(SeqFormat)
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(files = 3, "Persisted collections");
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("INFO"));
        assert!(out.contains("logging.rs:"));
        assert!(out.contains("Persisted collections"));
        assert!(out.contains("files=3"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_resolve_dir_defaults_under_data_dir() {
        let config = LoggerConfig::default();
        assert_eq!(
            config.resolve_dir(Path::new("/srv/vault")),
            PathBuf::from("/srv/vault/logs")
        );
    }

    #[test]
    fn test_bad_level_rejected() {
        assert!(make_filter("info").is_ok());
        assert!(matches!(
            make_filter("vault_core=loud"),
            Err(AppError::InvalidInput { .. })
        ));
    }
}
