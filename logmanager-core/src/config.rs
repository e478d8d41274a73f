use std::sync::LazyLock;

use derive_from_env::FromEnv;

/// Process-wide defaults read from `LOGMANAGER_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "LOGMANAGER")]
#[allow(non_snake_case)]
pub struct LogManagerConfig {
    #[from_env(default = "false")]
    pub RECORD_TIMESTAMP: bool,
    #[from_env(default = "true")]
    pub FILE_LINE_QUIET: bool,
    #[from_env(default = "false")]
    pub INFO_QUIET: bool,
    #[from_env(default = "false")]
    pub WARNING_QUIET: bool,
    #[from_env(default = "false")]
    pub ERROR_QUIET: bool,
    #[from_env(default = "false")]
    pub FAILED_ASSERT_QUIET: bool,
    #[from_env(default = "false")]
    pub DEBUG_QUIET: bool,
    /// File name joined onto the working directory for the default file sink.
    #[from_env(default = "log.log")]
    pub LOG_FILE_NAME: String,
    /// Color level tags on the stderr debug output.
    #[from_env(default = "false")]
    pub COLOR: bool,
    /// Route the `log` crate macros through the hook table.
    #[from_env(default = "true")]
    pub LOG_BRIDGE: bool,
}

pub static LOGMANAGER_CONFIG: LazyLock<LogManagerConfig> =
    LazyLock::new(|| LogManagerConfig::from_env().unwrap());
