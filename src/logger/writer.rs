//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr.
//! Log files can be reopened at runtime after rotation.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(File),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Access and info log target
    access: Mutex<LogTarget>,
    /// Error log target
    error: Mutex<LogTarget>,
}

impl LogWriter {
    /// Create a new log writer with optional file paths
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: Mutex::new(open_target(access_log_file, LogTarget::Stdout)?),
            error: Mutex::new(open_target(error_log_file, LogTarget::Stderr)?),
        })
    }

    /// Write to access log
    pub fn write_access(&self, message: &str) {
        write_to(&self.access, message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        write_to(&self.error, message);
    }

    /// Write info message (to access log target)
    pub fn write_info(&self, message: &str) {
        write_to(&self.access, message);
    }

    /// Point the access log at a new file, or stdout
    pub fn set_access_log_file(&self, path: Option<&str>) -> io::Result<()> {
        let target = open_target(path, LogTarget::Stdout)?;
        if let Ok(mut current) = self.access.lock() {
            *current = target;
        }
        Ok(())
    }

    /// Point the error log at a new file, or stderr
    pub fn set_error_log_file(&self, path: Option<&str>) -> io::Result<()> {
        let target = open_target(path, LogTarget::Stderr)?;
        if let Ok(mut current) = self.error.lock() {
            *current = target;
        }
        Ok(())
    }
}

fn open_target(path: Option<&str>, fallback: LogTarget) -> io::Result<LogTarget> {
    match path {
        Some(p) => Ok(LogTarget::File(open_log_file(p)?)),
        None => Ok(fallback),
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to(target: &Mutex<LogTarget>, message: &str) {
    let Ok(mut target) = target.lock() else {
        return;
    };
    match &mut *target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(f) => {
            let _ = writeln!(f, "{message}");
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has been called
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_targets_append() {
        let tmp = TempDir::new().unwrap();
        let access = tmp.path().join("logs/access.log");
        let error = tmp.path().join("logs/error.log");

        let writer = LogWriter::new(access.to_str(), error.to_str()).unwrap();
        writer.write_access("GET /");
        writer.write_info("started");
        writer.write_error("boom");

        assert_eq!(std::fs::read_to_string(&access).unwrap(), "GET /\nstarted\n");
        assert_eq!(std::fs::read_to_string(&error).unwrap(), "boom\n");
    }

    #[test]
    fn test_reopen_switches_file() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("a.log");
        let second = tmp.path().join("b.log");

        let writer = LogWriter::new(first.to_str(), None).unwrap();
        writer.write_access("one");
        writer.set_access_log_file(second.to_str()).unwrap();
        writer.write_access("two");

        assert_eq!(std::fs::read_to_string(&first).unwrap(), "one\n");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "two\n");
    }
}
