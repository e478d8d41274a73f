use std::fmt;

use log::Level;

/// Severity of a message handed to the manager by one of the five host entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgLevel {
    Info,
    Warning,
    Error,
    Debug,
    FailedAssert,
}

impl MsgLevel {
    pub const ALL: [MsgLevel; 5] = [
        MsgLevel::Info,
        MsgLevel::Warning,
        MsgLevel::Error,
        MsgLevel::Debug,
        MsgLevel::FailedAssert,
    ];

    /// Fixed-width tag written in front of every message.
    pub fn tag(self) -> &'static str {
        match self {
            MsgLevel::Info => "INFO ",
            MsgLevel::Warning => "WARN ",
            MsgLevel::Error => "ERROR",
            MsgLevel::Debug => "DEBUG",
            MsgLevel::FailedAssert => "ASSERT",
        }
    }
}

impl fmt::Display for MsgLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag().trim_end())
    }
}

impl From<Level> for MsgLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => MsgLevel::Error,
            Level::Warn => MsgLevel::Warning,
            Level::Info => MsgLevel::Info,
            Level::Debug | Level::Trace => MsgLevel::Debug,
        }
    }
}

#[test]
fn test_level_tags() {
    let tags: Vec<_> = MsgLevel::ALL.iter().map(|l| l.tag()).collect();
    assert_eq!(tags, ["INFO ", "WARN ", "ERROR", "DEBUG", "ASSERT"]);
    assert_eq!(MsgLevel::Warning.to_string(), "WARN");
    assert_eq!(MsgLevel::from(Level::Trace), MsgLevel::Debug);
}
