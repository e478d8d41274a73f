//! Process-wide table of level hooks the host application logs through.
//!
//! The table is a stack: installing pushes a hook set, uninstalling removes the
//! set belonging to a token, and the top entry (or the built-in stderr hooks
//! when the stack is empty) receives every call.

use std::{
    io::Write,
    sync::{
        Arc, LazyLock, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use log::{LevelFilter, Log};
use uuid::Uuid;

use crate::level::MsgLevel;

/// Signature shared by the five entry points: file, line, function, message.
pub type HookFn = fn(Option<&str>, u32, &str, &str);

/// One set of level hooks.
#[derive(Clone, Copy)]
pub struct LoggerHooks {
    pub error_msg: HookFn,
    pub warning_msg: HookFn,
    pub info_msg: HookFn,
    pub debug_msg: HookFn,
    pub failed_assert: HookFn,
}

impl LoggerHooks {
    pub fn for_level(&self, level: MsgLevel) -> HookFn {
        match level {
            MsgLevel::Error => self.error_msg,
            MsgLevel::Warning => self.warning_msg,
            MsgLevel::Info => self.info_msg,
            MsgLevel::Debug => self.debug_msg,
            MsgLevel::FailedAssert => self.failed_assert,
        }
    }
}

fn fallback(level: MsgLevel, message: &str) {
    writeln!(std::io::stderr().lock(), "{}: {message}", level.tag()).ok();
}

fn fallback_error(_: Option<&str>, _: u32, _: &str, message: &str) {
    fallback(MsgLevel::Error, message);
}
fn fallback_warning(_: Option<&str>, _: u32, _: &str, message: &str) {
    fallback(MsgLevel::Warning, message);
}
fn fallback_info(_: Option<&str>, _: u32, _: &str, message: &str) {
    fallback(MsgLevel::Info, message);
}
fn fallback_debug(_: Option<&str>, _: u32, _: &str, message: &str) {
    fallback(MsgLevel::Debug, message);
}
fn fallback_failed_assert(_: Option<&str>, _: u32, _: &str, message: &str) {
    fallback(MsgLevel::FailedAssert, message);
}

impl Default for LoggerHooks {
    /// Hooks active while nothing is installed: plain lines on stderr.
    fn default() -> Self {
        Self {
            error_msg: fallback_error,
            warning_msg: fallback_warning,
            info_msg: fallback_info,
            debug_msg: fallback_debug,
            failed_assert: fallback_failed_assert,
        }
    }
}

/// Identifies one installed hook set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookToken(Uuid);

/// Receiver of dispatched messages that stays reachable through its `Arc`.
///
/// A call that picked the sink off the stack keeps it alive even if the sink is
/// uninstalled before the call lands.
pub trait LevelSink: Send + Sync {
    fn log_msg(&self, level: MsgLevel, file: Option<&str>, line: u32, function: &str, message: &str);

    /// Most verbose `log` record the bridge forwards to this sink.
    fn bridge_level(&self) -> LevelFilter {
        LevelFilter::Trace
    }
}

#[derive(Clone)]
struct Entry {
    token: HookToken,
    hooks: LoggerHooks,
    sink: Option<Arc<dyn LevelSink>>,
}

impl Entry {
    fn call(&self, level: MsgLevel, file: Option<&str>, line: u32, function: &str, message: &str) {
        match &self.sink {
            Some(sink) => sink.log_msg(level, file, line, function, message),
            None => (self.hooks.for_level(level))(file, line, function, message),
        }
    }
}

static HOOK_STACK: LazyLock<RwLock<Vec<Entry>>> = LazyLock::new(|| RwLock::new(Vec::new()));

fn push(hooks: LoggerHooks, sink: Option<Arc<dyn LevelSink>>) -> HookToken {
    let token = HookToken(Uuid::new_v4());
    HOOK_STACK
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Entry { token, hooks, sink });
    token
}

fn top() -> Option<Entry> {
    HOOK_STACK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .last()
        .cloned()
}

/// Makes `hooks` the active set until its token is uninstalled.
pub fn install_hooks(hooks: LoggerHooks) -> HookToken {
    push(hooks, None)
}

/// Like [`install_hooks`], but dispatched calls go straight to `sink`.
///
/// `hooks` is still what [`current_hooks`] hands out to hosts that copy the table.
pub fn install_sink(hooks: LoggerHooks, sink: Arc<dyn LevelSink>) -> HookToken {
    push(hooks, Some(sink))
}

/// Removes the set installed under `token`. Returns false if it was already gone.
pub fn uninstall_hooks(token: HookToken) -> bool {
    let mut stack = HOOK_STACK.write().unwrap_or_else(PoisonError::into_inner);
    match stack.iter().rposition(|entry| entry.token == token) {
        Some(pos) => {
            stack.remove(pos);
            true
        }
        None => false,
    }
}

pub fn current_hooks() -> LoggerHooks {
    top().map(|entry| entry.hooks).unwrap_or_default()
}

/// Number of hook sets stacked above the built-in one.
pub fn installed_depth() -> usize {
    HOOK_STACK.read().unwrap_or_else(PoisonError::into_inner).len()
}

fn route(
    entry: Option<Entry>,
    level: MsgLevel,
    file: Option<&str>,
    line: u32,
    function: &str,
    message: &str,
) {
    match entry {
        Some(entry) => entry.call(level, file, line, function, message),
        None => (LoggerHooks::default().for_level(level))(file, line, function, message),
    }
}

/// Calls the active hook for `level`. The table lock is released before the call.
pub fn dispatch(level: MsgLevel, file: Option<&str>, line: u32, function: &str, message: &str) {
    route(top(), level, file, line, function, message);
}

pub fn info_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    dispatch(MsgLevel::Info, file, line, function, message);
}

pub fn warning_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    dispatch(MsgLevel::Warning, file, line, function, message);
}

pub fn error_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    dispatch(MsgLevel::Error, file, line, function, message);
}

pub fn debug_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    dispatch(MsgLevel::Debug, file, line, function, message);
}

pub fn failed_assert(file: Option<&str>, line: u32, function: &str, message: &str) {
    dispatch(MsgLevel::FailedAssert, file, line, function, message);
}

fn bridge_accepts(entry: Option<&Entry>, level: log::Level) -> bool {
    match entry.and_then(|entry| entry.sink.as_ref()) {
        Some(sink) => level <= sink.bridge_level(),
        None => true,
    }
}

/// Forwards `log` crate records into the hook table.
struct LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        bridge_accepts(top().as_ref(), metadata.level())
    }

    fn log(&self, record: &log::Record) {
        let entry = top();
        if !bridge_accepts(entry.as_ref(), record.level()) {
            return;
        }
        let message = record.args().to_string();
        let function = record.module_path().unwrap_or(record.target());
        route(
            entry,
            record.level().into(),
            record.file(),
            record.line().unwrap_or(0),
            function,
            &message,
        );
    }

    fn flush(&self) {}
}

static LOG_BRIDGE: LogBridge = LogBridge;
static LOG_BRIDGE_SET: AtomicBool = AtomicBool::new(false);

/// Registers the bridge as the `log` crate logger, once per process.
///
/// Returns false when another logger already owns the `log` facade.
pub fn init_log_bridge(level: LevelFilter) -> bool {
    if !LOG_BRIDGE_SET.load(Ordering::Acquire) {
        if log::set_logger(&LOG_BRIDGE).is_err() {
            return false;
        }
        LOG_BRIDGE_SET.store(true, Ordering::Release);
    }
    log::set_max_level(level);
    true
}

/// Sets the `log` max level, but only while the bridge owns the facade.
pub fn set_log_bridge_level(level: LevelFilter) {
    if LOG_BRIDGE_SET.load(Ordering::Acquire) {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static SERIAL: Mutex<()> = Mutex::new(());

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

    fn capture_a(_: Option<&str>, _: u32, _: &str, message: &str) {
        CAPTURED.lock().unwrap().push(format!("a:{message}"));
    }

    fn capture_b(file: Option<&str>, line: u32, function: &str, message: &str) {
        CAPTURED
            .lock()
            .unwrap()
            .push(format!("b:{}:{line}:{function}:{message}", file.unwrap_or("-")));
    }

    fn hooks_with(hook: HookFn) -> LoggerHooks {
        LoggerHooks {
            error_msg: hook,
            warning_msg: hook,
            info_msg: hook,
            debug_msg: hook,
            failed_assert: hook,
        }
    }

    fn drain() -> Vec<String> {
        std::mem::take(&mut *CAPTURED.lock().unwrap())
    }

    #[test]
    fn test_nested_install_uninstall() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        let depth = installed_depth();
        let outer = install_hooks(hooks_with(capture_a));
        info_msg(None, 0, "", "one");
        let inner = install_hooks(hooks_with(capture_b));
        error_msg(Some("a.c"), 10, "f", "two");
        assert!(uninstall_hooks(inner));
        assert!(!uninstall_hooks(inner));
        debug_msg(None, 0, "", "three");
        assert!(uninstall_hooks(outer));
        assert_eq!(installed_depth(), depth);
        assert_eq!(drain(), ["a:one", "b:a.c:10:f:two", "a:three"]);
    }

    #[test]
    fn test_out_of_order_uninstall() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        let outer = install_hooks(hooks_with(capture_a));
        let inner = install_hooks(hooks_with(capture_b));
        assert!(uninstall_hooks(outer));
        warning_msg(None, 3, "g", "still inner");
        assert!(uninstall_hooks(inner));
        assert_eq!(drain(), ["b:-:3:g:still inner"]);
    }

    #[test]
    fn test_log_bridge_routes_levels() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        assert!(init_log_bridge(LevelFilter::Debug));
        let token = install_hooks(LoggerHooks {
            error_msg: capture_b,
            ..hooks_with(capture_a)
        });
        log::error!("bridged");
        log::trace!("filtered out");
        log::debug!("debug");
        assert!(uninstall_hooks(token));
        let captured = drain();
        assert_eq!(captured.len(), 2);
        assert!(captured[0].starts_with("b:"));
        assert!(captured[0].ends_with(":logmanager_core::dispatch::tests:bridged"));
        assert_eq!(captured[1], "a:debug");
    }

    struct RecordingSink {
        lines: Mutex<Vec<String>>,
        bridge_level: LevelFilter,
    }

    impl LevelSink for RecordingSink {
        fn log_msg(&self, level: MsgLevel, _: Option<&str>, _: u32, _: &str, message: &str) {
            self.lines.lock().unwrap().push(format!("{}: {message}", level.tag()));
        }

        fn bridge_level(&self) -> LevelFilter {
            self.bridge_level
        }
    }

    fn recording_sink(bridge_level: LevelFilter) -> Arc<RecordingSink> {
        Arc::new(RecordingSink {
            lines: Mutex::new(Vec::new()),
            bridge_level,
        })
    }

    #[test]
    fn test_sink_outlives_uninstall() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        let sink = recording_sink(LevelFilter::Trace);
        let token = install_sink(hooks_with(capture_a), sink.clone());
        warning_msg(None, 0, "f", "installed");
        // a call that already picked the entry lands after the uninstall
        let picked = top();
        assert!(uninstall_hooks(token));
        route(picked, MsgLevel::Error, None, 0, "f", "late");
        assert_eq!(*sink.lines.lock().unwrap(), ["WARN : installed", "ERROR: late"]);
        // the copied fn pointers are the plain hooks
        assert!(drain().is_empty());
        let token = install_sink(hooks_with(capture_a), sink.clone());
        (current_hooks().info_msg)(None, 0, "f", "copied");
        assert!(uninstall_hooks(token));
        assert_eq!(drain(), ["a:copied"]);
    }

    #[test]
    fn test_log_bridge_honours_sink_level() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(init_log_bridge(LevelFilter::Trace));
        let muted = recording_sink(LevelFilter::Off);
        let token = install_sink(hooks_with(capture_a), muted.clone());
        log::error!("not for this sink");
        assert!(uninstall_hooks(token));
        assert!(muted.lines.lock().unwrap().is_empty());

        let warn_only = recording_sink(LevelFilter::Warn);
        let token = install_sink(hooks_with(capture_a), warn_only.clone());
        log::info!("too verbose");
        log::warn!("kept");
        assert!(uninstall_hooks(token));
        assert_eq!(*warn_only.lines.lock().unwrap(), ["WARN : kept"]);
        set_log_bridge_level(LevelFilter::Debug);
    }
}
