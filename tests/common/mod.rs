#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, unbounded};
use logmanager::{ConfigBuilder, DebugOutput, LogManager, manager_config};
use tempfile::TempDir;

static SERIAL: Mutex<()> = Mutex::new(());

/// Only one manager may live per process, so tests touching it run one at a time.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A manager writing its debug output into a channel and its file into a temp dir.
///
/// Field order matters: the manager is dropped before the serial guard is released.
pub struct Harness {
    pub manager: LogManager,
    pub output: Receiver<String>,
    pub dir: TempDir,
    pub serial: MutexGuard<'static, ()>,
}

impl Harness {
    /// Everything written to the debug output since the last call.
    pub fn drain(&self) -> Vec<String> {
        self.output.try_iter().collect()
    }

    pub fn log_path(&self) -> std::path::PathBuf {
        self.dir.path().join("test.log")
    }

    pub fn file_content(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap()
    }
}

pub fn start_manager(configure: impl FnOnce(ConfigBuilder) -> ConfigBuilder) -> Harness {
    let serial = serial();
    let dir = tempfile::tempdir().unwrap();
    let (sender, output) = unbounded();
    let builder = manager_config()
        .with_log_file(dir.path().join("test.log"))
        .with_debug_output(DebugOutput::Channel(sender))
        .with_record_timestamp(false)
        .with_file_line_quiet(true);
    let manager = configure(builder).install().expect("Failed to install log manager");
    Harness {
        manager,
        output,
        dir,
        serial,
    }
}
