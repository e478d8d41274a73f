//! The single active manager and the five hooks it installs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use logmanager_core::{LoggerHooks, MsgLevel};

use crate::{
    error::{LogManagerError, Result},
    manager::Shared,
};

static ACTIVE: Mutex<Option<Arc<Shared>>> = Mutex::new(None);

fn lock_active() -> MutexGuard<'static, Option<Arc<Shared>>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive claim on the empty singleton slot.
///
/// Holding it keeps any concurrent creation out until `publish` is called.
pub(crate) struct VacantSlot(MutexGuard<'static, Option<Arc<Shared>>>);

impl VacantSlot {
    pub(crate) fn claim() -> Result<Self> {
        let slot = lock_active();
        if slot.is_some() {
            return Err(LogManagerError::AlreadyActive);
        }
        Ok(Self(slot))
    }

    pub(crate) fn publish(mut self, shared: Arc<Shared>) {
        *self.0 = Some(shared);
    }
}

/// Clears the slot if it still holds `shared`.
pub(crate) fn retract(shared: &Arc<Shared>) {
    let mut slot = lock_active();
    if slot.as_ref().is_some_and(|active| Arc::ptr_eq(active, shared)) {
        *slot = None;
    }
}

pub(crate) fn is_active() -> bool {
    lock_active().is_some()
}

fn active() -> Arc<Shared> {
    let active = lock_active().clone();
    match active {
        Some(shared) => shared,
        None => panic!("{}", LogManagerError::InvalidHandle),
    }
}

fn emit_active(level: MsgLevel, file: Option<&str>, line: u32, function: &str, message: &str) {
    active().emit(level, file, line, function, message);
}

fn info_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    emit_active(MsgLevel::Info, file, line, function, message);
}

fn warning_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    emit_active(MsgLevel::Warning, file, line, function, message);
}

fn error_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    emit_active(MsgLevel::Error, file, line, function, message);
}

fn debug_msg(file: Option<&str>, line: u32, function: &str, message: &str) {
    emit_active(MsgLevel::Debug, file, line, function, message);
}

fn failed_assert(file: Option<&str>, line: u32, function: &str, message: &str) {
    emit_active(MsgLevel::FailedAssert, file, line, function, message);
}

/// Entry points routed to whichever manager is active.
pub(crate) const MANAGER_HOOKS: LoggerHooks = LoggerHooks {
    error_msg,
    warning_msg,
    info_msg,
    debug_msg,
    failed_assert,
};
