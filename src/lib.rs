//! # logmanager
//! Process-wide logger with per-level muting, optional timestamps and a mirrored log file.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! logmanager = "0.1.0"
//! ```
//!
//! ```rust
//! use logmanager::{LogManager, dispatch};
//!
//! // opens <current dir>/log.log and takes over the process-wide hooks
//! let manager = LogManager::create().expect("another manager is installed");
//! dispatch::error_msg(None, 0, "main", "disk full");
//! assert_eq!(manager.last_message(), "ERROR: disk full\n");
//! # std::fs::remove_file("log.log").ok();
//! // dropping the handle closes the file and restores the previous hooks
//! ```
//!
//! ## Configuring the manager
//! Defaults come from `LOGMANAGER_*` environment variables and can be overridden
//! with the builder. Every switch can also be flipped at runtime.
//!
//! ```rust
//! use logmanager::{MsgLevel, manager_config, dispatch};
//!
//! let manager = manager_config()
//!     .no_file()
//!     .with_file_line_quiet(false)
//!     .with_quiet(MsgLevel::Debug, true)
//!     .install()
//!     .unwrap();
//!
//! dispatch::warning_msg(Some("a.c"), 10, "f", "hi");
//! assert_eq!(manager.last_message(), "WARN : a.c(10) - f: hi\n");
//!
//! dispatch::debug_msg(None, 0, "f", "muted");
//! assert_eq!(manager.last_message(), "WARN : a.c(10) - f: hi\n");
//!
//! manager.set_record_timestamp(true);
//! log::info!("through the log crate");
//! assert!(manager.last_message().starts_with('['));
//! ```
//!
//! ## Switching log files
//! ```rust
//! use logmanager::manager_config;
//!
//! let manager = manager_config().no_file().install().unwrap();
//! manager.use_file_for_log("/tmp/logmanager_doc.log").unwrap();
//! log::warn!("written to the new file");
//! manager.close_log_file();
//! let content = std::fs::read_to_string("/tmp/logmanager_doc.log").unwrap();
//! assert!(content.ends_with("WARN : written to the new file\n"));
//! ```

mod error;
mod manager;
mod registry;

use std::path::{Path, PathBuf};

use log::LevelFilter;
use logmanager_core::LOGMANAGER_CONFIG;

pub use error::{LogManagerError, Result};
pub use logmanager_core::{
    DebugOutput, HookFn, HookToken, LoggerHooks, MAX_MESSAGE_LEN, MsgLevel, dispatch,
};
pub use manager::LogManager;

/// Where the file sink points when the manager is installed.
enum LogFileTarget {
    /// `<current dir>/<LOGMANAGER_LOG_FILE_NAME>`, silently skipped if it cannot be opened.
    Default,
    Path(PathBuf),
    Disabled,
}

/// Builder for configuring and installing the log manager.
pub struct ConfigBuilder {
    log_file: LogFileTarget,
    debug_output: DebugOutput,
    record_timestamp: bool,
    file_line_quiet: bool,
    info_quiet: bool,
    warning_quiet: bool,
    error_quiet: bool,
    failed_assert_quiet: bool,
    debug_quiet: bool,
    log_bridge: bool,
    max_level: LevelFilter,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        let env = &*LOGMANAGER_CONFIG;
        Self {
            log_file: LogFileTarget::Default,
            debug_output: DebugOutput::Stderr { colored: env.COLOR },
            record_timestamp: env.RECORD_TIMESTAMP,
            file_line_quiet: env.FILE_LINE_QUIET,
            info_quiet: env.INFO_QUIET,
            warning_quiet: env.WARNING_QUIET,
            error_quiet: env.ERROR_QUIET,
            failed_assert_quiet: env.FAILED_ASSERT_QUIET,
            debug_quiet: env.DEBUG_QUIET,
            log_bridge: env.LOG_BRIDGE,
            max_level: LevelFilter::Debug,
        }
    }
}

impl ConfigBuilder {
    /// Sets the log file. Failing to open it is reported once the manager is up.
    pub fn with_log_file<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            log_file: LogFileTarget::Path(path.as_ref().to_path_buf()),
            ..self
        }
    }
    /// Start without a log file
    pub fn no_file(self) -> Self {
        Self {
            log_file: LogFileTarget::Disabled,
            ..self
        }
    }
    /// Sets the debug output channel
    pub fn with_debug_output(self, debug_output: DebugOutput) -> Self {
        Self {
            debug_output,
            ..self
        }
    }
    pub fn with_record_timestamp(self, yes: bool) -> Self {
        Self {
            record_timestamp: yes,
            ..self
        }
    }
    pub fn with_file_line_quiet(self, yes: bool) -> Self {
        Self {
            file_line_quiet: yes,
            ..self
        }
    }
    /// Mutes or unmutes one level from the start.
    pub fn with_quiet(mut self, level: MsgLevel, yes: bool) -> Self {
        let flag = match level {
            MsgLevel::Info => &mut self.info_quiet,
            MsgLevel::Warning => &mut self.warning_quiet,
            MsgLevel::Error => &mut self.error_quiet,
            MsgLevel::Debug => &mut self.debug_quiet,
            MsgLevel::FailedAssert => &mut self.failed_assert_quiet,
        };
        *flag = yes;
        self
    }
    /// Dynamically set whether `log` crate macros are routed to the manager.
    ///
    /// When off, records are dropped while this manager is installed, even if an
    /// earlier manager registered the bridge. The `log` max level is reset to
    /// `Off` when the manager is destroyed.
    pub fn with_log_bridge(self, yes: bool) -> Self {
        Self {
            log_bridge: yes,
            ..self
        }
    }
    /// Maximum level let through by the `log` crate bridge. Ignored when the bridge is off.
    pub fn with_max_level(self, max_level: LevelFilter) -> Self {
        Self { max_level, ..self }
    }
    /// Installs the manager as the process-wide logger.
    ///
    /// Fails with [`LogManagerError::AlreadyActive`] while another handle is alive.
    #[must_use = "dropping the LogManager uninstalls it. Do \"let manager = manager_config().install()?;\""]
    pub fn install(self) -> Result<LogManager> {
        LogManager::install(self)
    }
}

/// Returns a default ConfigBuilder for configuring the log manager.
pub fn manager_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
