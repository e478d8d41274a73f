use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use colored::Colorize;
use crossbeam_channel::Sender;

use crate::level::MsgLevel;

/// A sink receiving already formatted lines.
pub trait LogWriter {
    fn regular(&mut self, level: MsgLevel, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// File sink. The file is created, or truncated, every time it is opened.
pub struct LogFile {
    file: BufWriter<File>,
    path: PathBuf,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)?;
        Ok(Self {
            file: BufWriter::new(file),
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogWriter for LogFile {
    fn regular(&mut self, _: MsgLevel, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[test]
fn test_log_file_truncates_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_log_file.log");
    std::fs::write(&path, "stale content\n").unwrap();
    let mut log_file = LogFile::new(&path).unwrap();
    assert_eq!(log_file.path(), path);
    log_file.regular(MsgLevel::Info, "INFO : Hello, world!\n").unwrap();
    log_file.regular(MsgLevel::Error, "ERROR: rust is awesome !\n").unwrap();
    log_file.flush().unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "INFO : Hello, world!\nERROR: rust is awesome !\n"
    );
}

/// The debug output channel every message is mirrored to.
#[derive(Debug, Clone)]
pub enum DebugOutput {
    /// Standard error, optionally with a colored level tag.
    Stderr { colored: bool },
    Stdout,
    /// Hands each line, unchanged, to a channel.
    Channel(Sender<String>),
    Silent,
}

impl Default for DebugOutput {
    fn default() -> Self {
        DebugOutput::Stderr { colored: false }
    }
}

fn colorize(level: MsgLevel, line: &str) -> String {
    let tag = level.tag();
    let colored_tag = match level {
        MsgLevel::Error => tag.red(),
        MsgLevel::Warning => tag.yellow(),
        MsgLevel::Info => tag.green(),
        MsgLevel::Debug => tag.blue(),
        MsgLevel::FailedAssert => tag.purple(),
    };
    line.replacen(tag, &colored_tag.to_string(), 1)
}

impl LogWriter for DebugOutput {
    fn regular(&mut self, level: MsgLevel, line: &str) -> io::Result<()> {
        match self {
            DebugOutput::Stderr { colored: true } => {
                io::stderr().lock().write_all(colorize(level, line).as_bytes())
            }
            DebugOutput::Stderr { colored: false } => io::stderr().lock().write_all(line.as_bytes()),
            DebugOutput::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            // A dropped receiver only means nobody is listening anymore.
            DebugOutput::Channel(sender) => {
                sender.send(line.to_string()).ok();
                Ok(())
            }
            DebugOutput::Silent => Ok(()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DebugOutput::Stderr { .. } => io::stderr().flush(),
            DebugOutput::Stdout => io::stdout().flush(),
            DebugOutput::Channel(_) | DebugOutput::Silent => Ok(()),
        }
    }
}

#[test]
fn test_debug_output_channel() {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let mut output = DebugOutput::Channel(sender);
    output.regular(MsgLevel::Warning, "WARN : careful\n").unwrap();
    output.flush().unwrap();
    drop(output);
    assert_eq!(receiver.iter().collect::<Vec<_>>(), ["WARN : careful\n"]);
}

#[test]
fn test_colorize_only_touches_tag() {
    colored::control::set_override(true);
    let line = colorize(MsgLevel::Error, "[Mon Oct 19 10:00:00 2026] ERROR: disk ERROR\n");
    colored::control::unset_override();
    assert!(line.starts_with("[Mon Oct 19 10:00:00 2026] \u{1b}["));
    assert!(line.ends_with(": disk ERROR\n"));
}

#[test]
fn test_stderr_output() {
    let mut output = DebugOutput::Stderr { colored: true };
    output.regular(MsgLevel::Debug, "DEBUG: to stderr\n").unwrap();
    output.flush().unwrap();
}
