use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use log::LevelFilter;
use logmanager_core::{
    DebugOutput, HookToken, LOGMANAGER_CONFIG, LevelSink, LogFile, LogWriter, MsgLevel, dispatch,
    format_message, timestamp, truncate_message, with_timestamp,
};

use crate::{
    ConfigBuilder, LogFileTarget,
    error::{LogManagerError, Result},
    registry::{self, MANAGER_HOOKS, VacantSlot},
};

/// Everything a write touches. Only accessed with the sink mutex held.
struct SinkState {
    debug_output: DebugOutput,
    file: Option<LogFile>,
    last_message: String,
}

/// Runtime switches. Read and written without the sink mutex.
struct Flags {
    record_timestamp: AtomicBool,
    file_line_quiet: AtomicBool,
    info_quiet: AtomicBool,
    warning_quiet: AtomicBool,
    error_quiet: AtomicBool,
    failed_assert_quiet: AtomicBool,
    debug_quiet: AtomicBool,
}

impl Flags {
    fn quiet(&self, level: MsgLevel) -> &AtomicBool {
        match level {
            MsgLevel::Info => &self.info_quiet,
            MsgLevel::Warning => &self.warning_quiet,
            MsgLevel::Error => &self.error_quiet,
            MsgLevel::Debug => &self.debug_quiet,
            MsgLevel::FailedAssert => &self.failed_assert_quiet,
        }
    }
}

/// State shared between the handle and the installed hooks.
pub(crate) struct Shared {
    sink: Mutex<SinkState>,
    flags: Flags,
    /// `Off` when `log` records are not routed to this manager.
    bridge_level: LevelFilter,
}

impl Shared {
    fn lock_sink(&self) -> MutexGuard<'_, SinkState> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn emit(
        &self,
        level: MsgLevel,
        file: Option<&str>,
        line: u32,
        function: &str,
        message: &str,
    ) {
        if self.flags.quiet(level).load(Ordering::Relaxed) {
            return;
        }
        let file_line_quiet = self.flags.file_line_quiet.load(Ordering::Relaxed);
        let mut formatted = format_message(level, file, line, function, message, file_line_quiet);
        if self.flags.record_timestamp.load(Ordering::Relaxed) {
            formatted = with_timestamp(&timestamp(), &formatted);
        }
        let formatted = truncate_message(formatted);

        let mut sink = self.lock_sink();
        let SinkState {
            debug_output,
            file,
            last_message,
        } = &mut *sink;
        last_message.clone_from(&formatted);
        debug_output
            .regular(level, &formatted)
            .and_then(|_| debug_output.flush())
            .ok();
        if let Some(log_file) = file {
            log_file
                .regular(level, &formatted)
                .and_then(|_| log_file.flush())
                .ok();
        }
    }
}

impl LevelSink for Shared {
    fn log_msg(&self, level: MsgLevel, file: Option<&str>, line: u32, function: &str, message: &str) {
        self.emit(level, file, line, function, message);
    }

    fn bridge_level(&self) -> LevelFilter {
        self.bridge_level
    }
}

fn default_log_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(&LOGMANAGER_CONFIG.LOG_FILE_NAME))
}

/// Handle to the installed log manager.
///
/// Dropping the handle (or calling [`LogManager::destroy`]) closes the log file,
/// restores the hooks that were active before and frees the singleton slot.
pub struct LogManager {
    shared: Arc<Shared>,
    token: HookToken,
}

impl LogManager {
    /// Installs a manager with the environment defaults and `<cwd>/log.log` as file sink.
    pub fn create() -> Result<Self> {
        crate::manager_config().install()
    }

    pub(crate) fn install(config: ConfigBuilder) -> Result<Self> {
        let ConfigBuilder {
            log_file,
            debug_output,
            record_timestamp,
            file_line_quiet,
            info_quiet,
            warning_quiet,
            error_quiet,
            failed_assert_quiet,
            debug_quiet,
            log_bridge,
            max_level,
        } = config;

        let slot = VacantSlot::claim()?;

        let mut failed_path = None;
        let file = match log_file {
            LogFileTarget::Default => default_log_path().and_then(|path| LogFile::new(path).ok()),
            LogFileTarget::Path(path) => match LogFile::new(&path) {
                Ok(file) => Some(file),
                Err(_) => {
                    failed_path = Some(path);
                    None
                }
            },
            LogFileTarget::Disabled => None,
        };

        let shared = Arc::new(Shared {
            sink: Mutex::new(SinkState {
                debug_output,
                file,
                last_message: String::new(),
            }),
            flags: Flags {
                record_timestamp: AtomicBool::new(record_timestamp),
                file_line_quiet: AtomicBool::new(file_line_quiet),
                info_quiet: AtomicBool::new(info_quiet),
                warning_quiet: AtomicBool::new(warning_quiet),
                error_quiet: AtomicBool::new(error_quiet),
                failed_assert_quiet: AtomicBool::new(failed_assert_quiet),
                debug_quiet: AtomicBool::new(debug_quiet),
            },
            bridge_level: if log_bridge { max_level } else { LevelFilter::Off },
        });
        let token = dispatch::install_sink(MANAGER_HOOKS, shared.clone());
        slot.publish(Arc::clone(&shared));

        if log_bridge {
            dispatch::init_log_bridge(max_level);
        } else {
            dispatch::set_log_bridge_level(LevelFilter::Off);
        }
        if let Some(path) = failed_path {
            shared.emit(
                MsgLevel::Error,
                Some(file!()),
                line!(),
                "install",
                &format!("Failed to create log file {}", path.display()),
            );
        }
        Ok(Self { shared, token })
    }

    /// Whether some manager currently owns the singleton slot.
    pub fn is_installed() -> bool {
        registry::is_active()
    }

    /// Tears the manager down. Equivalent to dropping the handle.
    pub fn destroy(self) {}

    /// Formats `message` and writes it to the debug output and the log file.
    pub fn emit(
        &self,
        level: MsgLevel,
        file: Option<&str>,
        line: u32,
        function: &str,
        message: &str,
    ) {
        self.shared.emit(level, file, line, function, message);
    }

    /// Switches the file sink to `path`, created or truncated.
    ///
    /// Asking for the file that is already open does nothing. The outcome is
    /// reported through the manager itself once the sink lock is released.
    pub fn use_file_for_log<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let opened = {
            let mut sink = self.shared.lock_sink();
            if sink.file.as_ref().is_some_and(|file| file.path() == path) {
                return Ok(());
            }
            sink.file = None;
            LogFile::new(path).map(|file| sink.file = Some(file))
        };
        match opened {
            Ok(()) => {
                self.shared.emit(
                    MsgLevel::Info,
                    Some(file!()),
                    line!(),
                    "use_file_for_log",
                    &format!("Opened log file {}", path.display()),
                );
                Ok(())
            }
            Err(source) => {
                self.shared.emit(
                    MsgLevel::Error,
                    Some(file!()),
                    line!(),
                    "use_file_for_log",
                    &format!("Failed to create log file {}", path.display()),
                );
                Err(LogManagerError::FileOpenFailed {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Closes the file sink, if any. Messages keep going to the debug output.
    pub fn close_log_file(&self) {
        self.shared.lock_sink().file = None;
    }

    /// Path of the open file sink, `None` when no file is open.
    pub fn current_file_path(&self) -> Option<PathBuf> {
        self.shared
            .lock_sink()
            .file
            .as_ref()
            .map(|file| file.path().to_path_buf())
    }

    /// The most recently written line, newline included.
    pub fn last_message(&self) -> String {
        self.shared.lock_sink().last_message.clone()
    }

    pub fn set_record_timestamp(&self, enable: bool) {
        self.shared
            .flags
            .record_timestamp
            .store(enable, Ordering::Relaxed);
    }

    pub fn record_timestamp(&self) -> bool {
        self.shared.flags.record_timestamp.load(Ordering::Relaxed)
    }

    /// When set, file, line and function are left out of every line.
    pub fn set_file_line_quiet(&self, enable: bool) {
        self.shared
            .flags
            .file_line_quiet
            .store(enable, Ordering::Relaxed);
    }

    pub fn is_file_line_quiet(&self) -> bool {
        self.shared.flags.file_line_quiet.load(Ordering::Relaxed)
    }

    /// Silences, or unsilences, a single level.
    pub fn set_quiet(&self, level: MsgLevel, enable: bool) {
        self.shared.flags.quiet(level).store(enable, Ordering::Relaxed);
    }

    pub fn is_quiet(&self, level: MsgLevel) -> bool {
        self.shared.flags.quiet(level).load(Ordering::Relaxed)
    }

    pub fn set_info_quiet(&self, enable: bool) {
        self.set_quiet(MsgLevel::Info, enable);
    }

    pub fn is_info_quiet(&self) -> bool {
        self.is_quiet(MsgLevel::Info)
    }

    pub fn set_warning_quiet(&self, enable: bool) {
        self.set_quiet(MsgLevel::Warning, enable);
    }

    pub fn is_warning_quiet(&self) -> bool {
        self.is_quiet(MsgLevel::Warning)
    }

    pub fn set_error_quiet(&self, enable: bool) {
        self.set_quiet(MsgLevel::Error, enable);
    }

    pub fn is_error_quiet(&self) -> bool {
        self.is_quiet(MsgLevel::Error)
    }

    pub fn set_failed_assert_quiet(&self, enable: bool) {
        self.set_quiet(MsgLevel::FailedAssert, enable);
    }

    pub fn is_failed_assert_quiet(&self) -> bool {
        self.is_quiet(MsgLevel::FailedAssert)
    }

    pub fn set_debug_quiet(&self, enable: bool) {
        self.set_quiet(MsgLevel::Debug, enable);
    }

    pub fn is_debug_quiet(&self) -> bool {
        self.is_quiet(MsgLevel::Debug)
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.close_log_file();
        dispatch::uninstall_hooks(self.token);
        dispatch::set_log_bridge_level(LevelFilter::Off);
        registry::retract(&self.shared);
    }
}
