//! Tests for wrapping panics through the per-thread panic record.

use netsec_error::{CapturedError, PanicFailure, capture_panic, install_hook};
use std::any::Any;
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[test]
fn test_integer_division_by_zero_is_located_at_the_division() {
    let divisor = black_box(0_i32);

    let (result, line) = (capture_panic(|| 1 / divisor), line!());
    let err = result.unwrap_err();

    assert_eq!(
        err.describe(),
        format!(
            "Error occurred in script [{}] at line number [{}] error message [attempt to divide by zero]",
            file!(),
            line
        )
    );
}

#[test]
fn test_no_panic_returns_value() {
    let result = capture_panic(|| 40 + 2);
    assert_eq!(result.unwrap(), 42);
}

#[test]
fn test_formatted_panic_message_is_kept() {
    let code = black_box(503);

    let err = capture_panic(|| -> u32 { panic!("upstream returned {}", code) }).unwrap_err();

    assert_eq!(
        err.downcast_ref::<PanicFailure>(),
        Some(&PanicFailure::new("upstream returned 503"))
    );
}

#[test]
fn test_from_panic_without_record_fails_fast() {
    let payload: Box<dyn Any + Send> = Box::new("never raised");

    let (result, line) = (CapturedError::from_panic(payload.as_ref()), line!());

    let err = result.unwrap_err();
    assert_eq!(err.line, line);
    assert_eq!(err.file, file!());
}

#[test]
fn test_from_panic_after_catch_unwind() {
    install_hook();

    let (caught, line) = (std::panic::catch_unwind(|| panic!("boom")), line!());
    let payload = caught.unwrap_err();

    let err = CapturedError::from_panic(payload.as_ref()).unwrap();
    assert_eq!(err.location().line(), line);
    assert!(err.describe().ends_with("error message [boom]"));
}

#[test]
fn test_recorded_panic_is_consumed() {
    install_hook();

    let payload = std::panic::catch_unwind(|| panic!("once")).unwrap_err();

    assert!(CapturedError::from_panic(payload.as_ref()).is_ok());
    assert!(CapturedError::from_panic(payload.as_ref()).is_err());
}

#[test]
fn test_capture_panic_consumes_its_record() {
    let _ = capture_panic(|| -> u32 { panic!("handled") });

    assert!(CapturedError::from_panic(&"handled").is_err());
}

#[test]
fn test_panic_handled_elsewhere_is_not_reused() {
    install_hook();
    let _ = std::panic::catch_unwind(|| panic!("old, already handled"));

    let fresh = std::panic::catch_unwind(|| -> u32 {
        std::panic::resume_unwind(Box::new("fresh failure"))
    })
    .unwrap_err();

    assert!(CapturedError::from_panic(fresh.as_ref()).is_err());
    assert!(CapturedError::from_panic(&"old, already handled").is_err());
}

#[test]
fn test_capture_panic_resumes_payload_without_matching_record() {
    let outer = std::panic::catch_unwind(|| {
        capture_panic(|| -> u32 {
            let _ = std::panic::catch_unwind(|| panic!("inner, already handled"));
            std::panic::resume_unwind(Box::new(String::from("rethrown")))
        })
    });

    let payload = outer.unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("rethrown"));
}

#[test]
fn test_same_message_with_different_payload_type_is_rejected() {
    install_hook();
    let _ = std::panic::catch_unwind(|| panic!("timeout"));

    let payload: Box<dyn Any + Send> = Box::new(String::from("timeout"));

    assert!(CapturedError::from_panic(payload.as_ref()).is_err());
}

#[test]
fn test_panic_records_are_per_thread() {
    install_hook();

    let payload = std::panic::catch_unwind(|| panic!("main thread")).unwrap_err();

    let other = std::thread::spawn(|| CapturedError::from_panic(&"main thread").is_err())
        .join()
        .unwrap();
    assert!(other);

    let err = CapturedError::from_panic(payload.as_ref()).unwrap();
    assert!(err.describe().contains("[main thread]"));
}

#[test]
fn test_nested_captures() {
    let outer = capture_panic(|| -> u32 {
        let inner = capture_panic(|| -> u32 { panic!("inner") });
        assert!(inner.is_err());
        panic!("outer")
    });

    let err = outer.unwrap_err();
    assert!(err.describe().ends_with("error message [outer]"));
}

/// Flags any event emitted while the current thread is unwinding.
struct EventsWhilePanicking(Arc<AtomicBool>);

impl<S: tracing::Subscriber> Layer<S> for EventsWhilePanicking {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if std::thread::panicking() {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_hook_does_not_log_while_panicking() {
    let logged_in_hook = Arc::new(AtomicBool::new(false));
    let subscriber =
        tracing_subscriber::registry().with(EventsWhilePanicking(Arc::clone(&logged_in_hook)));

    let err = tracing::subscriber::with_default(subscriber, || {
        capture_panic(|| -> u32 { panic!("quiet hook") })
    })
    .unwrap_err();

    assert!(err.describe().ends_with("error message [quiet hook]"));
    assert!(!logged_in_hook.load(Ordering::SeqCst));
}
