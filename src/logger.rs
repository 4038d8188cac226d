//! Minimal `log` backend: one line per record on stderr, level tag in color.

use std::io::Write;

use ansi_term::Colour::{Blue, Green, Purple, Red, Yellow};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

fn tag(level: Level) -> String {
    let text = format!("{:<5}", level);
    match level {
        Level::Error => Red.bold().paint(text),
        Level::Warn => Yellow.bold().paint(text),
        Level::Info => Green.paint(text),
        Level::Debug => Blue.paint(text),
        Level::Trace => Purple.paint(text),
    }
    .to_string()
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Trace lines are already laid out; skip the module path for them.
        let line = match record.level() {
            Level::Trace => format!("{} {}", tag(record.level()), record.args()),
            level => format!("{} [{}] {}", tag(level), record.target(), record.args()),
        };
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the logger with `level` as the global max level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
