//! Run log for geofence
//!
//! The run log records what each command did (inputs, counts, outputs) in a
//! plain text file. It also implements `log::Log` so it can stand in for
//! `env_logger` as the global logger when everything should go to the file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata};

/// File-backed run log
pub struct Logger {
    /// File handle for log output, `None` when logging is disabled
    file: Mutex<Option<File>>,
    /// Most verbose level written when used as the global logger
    level: Level,
}

impl Logger {
    /// Creates a logger writing to `log_file`, truncating it
    pub fn new<P: AsRef<Path>>(log_file: P) -> io::Result<Self> {
        let file = File::create(log_file.as_ref())?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: Level::Info,
        })
    }

    /// A logger that discards every message
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
            level: Level::Info,
        }
    }

    /// Set the most verbose level accepted through the `log` facade
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Appends a line to the run log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "run log lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Install a file logger as the global `log` backend
    pub fn init_global_logger<P: AsRef<Path>>(log_file: P, level: Level) -> io::Result<()> {
        let global_logger = Logger::new(log_file)?.with_level(level);

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter());
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let _ = Logger::log(self, &message);
        }
    }

    fn flush(&self) {
        // Each line is flushed as it is written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_log_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let logger = Logger::new(&path).unwrap();
        logger.log("records read: 3").unwrap();
        logger.log("records retained: 2").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "records read: 3\nrecords retained: 2\n");
    }

    #[test]
    fn test_disabled_logger_accepts_messages() {
        let logger = Logger::disabled();
        assert!(logger.log("ignored").is_ok());
    }

    #[test]
    fn test_level_filtering() {
        let logger = Logger::disabled().with_level(Level::Warn);
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Info).build()));
    }
}
