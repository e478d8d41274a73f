//! # logmanager-core
//! Core utilities for logmanager - message formatting, sinks and the process-wide hook table.

mod config;
pub mod dispatch;
mod level;
mod log_writer;
mod utils;

pub use config::{LOGMANAGER_CONFIG, LogManagerConfig};
pub use dispatch::{HookFn, HookToken, LevelSink, LoggerHooks};
pub use level::MsgLevel;
pub use log_writer::{DebugOutput, LogFile, LogWriter};
pub use utils::{
    MAX_MESSAGE_LEN, format_message, sanitize_timestamp, timestamp, truncate_message,
    with_timestamp,
};
