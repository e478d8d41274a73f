use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogManagerError {
    #[error("a log manager is already installed")]
    AlreadyActive,
    #[error("failed to create log file {}", path.display())]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no log manager is installed")]
    InvalidHandle,
}

pub type Result<T> = std::result::Result<T, LogManagerError>;
