//! Per-thread record of intercepted panics.
//!
//! A process-wide panic hook is installed the first time a capture scope is
//! entered. The hook stores the panic's message, payload type and location in
//! a thread-local slot, which [`capture_panic`] and
//! [`CapturedError::from_panic`] read back. A record is only used when it
//! matches the payload handed back by `catch_unwind`; records left behind by
//! panics handled elsewhere are discarded. Panics raised inside a capture
//! scope are not printed; all other panics go to the hook that was installed
//! before ours.

use crate::{CapturedError, SourceLocation};
use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::panic::UnwindSafe;
use std::sync::Once;
use tracing::{debug, trace};

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicRecord>> = const { RefCell::new(None) };
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// The underlying failure produced by an intercepted panic.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{}", message)]
pub struct PanicFailure {
    /// Panic message
    pub message: String,
}

impl PanicFailure {
    /// Create a panic failure from its message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Message and location of a panic, as seen by the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PanicRecord {
    failure: PanicFailure,
    payload_type: TypeId,
    location: Option<SourceLocation>,
}

impl PanicRecord {
    /// Whether this record was written for the panic that produced `payload`.
    ///
    /// `resume_unwind` bypasses the hook, so a payload resumed after an
    /// unrelated, already handled panic finds that panic's record here.
    fn belongs_to(&self, payload: &(dyn Any + Send)) -> bool {
        self.payload_type == (*payload).type_id() && self.failure.message == payload_message(payload)
    }

    /// Wrap the recorded failure at the panic site.
    pub(crate) fn into_captured(self) -> CapturedError {
        let location = self
            .location
            .unwrap_or_else(|| SourceLocation::new("<unknown>", 0, 0));
        CapturedError::with_location(Box::new(self.failure), location)
    }
}

/// Install the recording hook once per process.
///
/// Called implicitly by [`capture_panic`]. Installing it up front lets
/// [`CapturedError::from_panic`] be used with a hand-rolled
/// `std::panic::catch_unwind`.
///
/// `std::panic::set_hook` cannot be called while the thread is unwinding, so
/// installation is skipped (and `false` returned) when the first call happens
/// during a panic, e.g. from a `Drop` impl. Panics caught in that state carry
/// no record and are resumed by [`capture_panic`].
pub fn install_hook() -> bool {
    if INSTALL_HOOK.is_completed() {
        return true;
    }
    if std::thread::panicking() {
        return false;
    }

    INSTALL_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let payload = info.payload();
            let record = PanicRecord {
                failure: PanicFailure::new(payload_message(payload)),
                payload_type: (*payload).type_id(),
                location: info.location().map(SourceLocation::from),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(record));

            if CAPTURE_DEPTH.with(Cell::get) == 0 {
                previous(info);
            }
        }));
        debug!("Installed panic capture hook");
    });
    true
}

/// Run `f`, turning a panic into a [`CapturedError`] located at the panic
/// site.
///
/// Panics without a matching record are resumed unchanged. That covers hooks
/// replaced by someone else, payloads rethrown with `resume_unwind` and
/// installation skipped during unwinding.
///
/// # Examples
///
/// ```
/// use netsec_error::capture_panic;
///
/// let divisor = std::hint::black_box(0);
/// let err = capture_panic(|| 1 / divisor).unwrap_err();
/// assert!(err.describe().ends_with("error message [attempt to divide by zero]"));
/// ```
pub fn capture_panic<F, T>(f: F) -> Result<T, CapturedError>
where
    F: FnOnce() -> T + UnwindSafe,
{
    install_hook();
    clear_record();

    let outcome = {
        let _scope = CaptureScope::enter();
        std::panic::catch_unwind(f)
    };

    match outcome {
        Ok(value) => Ok(value),
        Err(payload) => match take_record_for(payload.as_ref()) {
            Some(record) => Err(record.into_captured()),
            None => std::panic::resume_unwind(payload),
        },
    }
}

/// Take the panic recorded on this thread, leaving the slot empty.
///
/// The record is returned only if it belongs to `payload`; a stale record is
/// dropped either way.
pub(crate) fn take_record_for(payload: &(dyn Any + Send)) -> Option<PanicRecord> {
    let record = LAST_PANIC.with(|slot| slot.borrow_mut().take())?;
    if record.belongs_to(payload) {
        trace!(?record, "Matched recorded panic");
        Some(record)
    } else {
        debug!(stale = ?record, "Discarded panic record from a panic handled elsewhere");
        None
    }
}

fn clear_record() {
    LAST_PANIC.with(|slot| slot.borrow_mut().take());
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Marks the current thread as inside a capture scope until dropped.
struct CaptureScope;

impl CaptureScope {
    fn enter() -> Self {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
