//! Console + log file output.
//!
//! Every line goes to stdout as `[YYYY-MM-DD HH:MM:SS] <message>`. When a log
//! file is configured the same line is appended to it; the file is opened in
//! append mode per event rather than held open for the whole run.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use super::format::log_timestamp;

/// Install the global subscriber. Call once at startup.
pub fn init(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(LogLineFormat)
        .with_writer(TeeWriter::new(log_file))
        .init();
}

/// `[timestamp] message` event layout
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "[{}] ", log_timestamp(&Local::now()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Hands out writers that copy each event to stdout and the log file
pub struct TeeWriter {
    log_file: Option<PathBuf>,
    open_failed: AtomicBool,
}

impl TeeWriter {
    pub fn new(log_file: Option<&Path>) -> Self {
        Self {
            log_file: log_file.map(Path::to_path_buf),
            open_failed: AtomicBool::new(false),
        }
    }

    fn open_log(&self) -> Option<File> {
        let path = self.log_file.as_ref()?;
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(f),
            Err(e) => {
                // Only complain once per run
                if !self.open_failed.swap(true, Ordering::Relaxed) {
                    eprintln!("Cannot open log file '{}': {}", path.display(), e);
                }
                None
            }
        }
    }
}

impl<'a> MakeWriter<'a> for TeeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            stdout: io::stdout(),
            file: self.open_log(),
        }
    }
}

/// Writer for a single event
pub struct LineWriter {
    stdout: io::Stdout,
    file: Option<File>,
}

impl Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        if let Some(ref mut f) = self.file {
            // A broken log file must not take the console down with it
            let _ = f.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(ref mut f) = self.file {
            let _ = f.flush();
        }
        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tee_appends_each_event() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("prune.log");
        std::fs::write(&log, "existing\n").unwrap();

        let tee = TeeWriter::new(Some(&log));
        tee.make_writer().write_all(b"first\n").unwrap();
        tee.make_writer().write_all(b"second\n").unwrap();

        let contents = std::fs::read_to_string(&log).unwrap();
        assert_eq!(contents, "existing\nfirst\nsecond\n");
    }

    #[test]
    fn test_unopenable_log_file_does_not_fail_writes() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("missing-dir").join("prune.log");

        let tee = TeeWriter::new(Some(&log));
        assert!(tee.make_writer().write_all(b"line\n").is_ok());
        assert!(tee.open_failed.load(Ordering::Relaxed));
        assert!(!log.exists());
    }
}
