//! Tests for explicit capture with `CapturedError::new` and `CaptureExt`.

use netsec_error::{CaptureExt, CapturedError, CapturedResult, Describe};
use std::error::Error as _;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("division by zero")]
struct DivisionByZero;

fn divide(numerator: i64, denominator: i64) -> Result<i64, DivisionByZero> {
    numerator.checked_div(denominator).ok_or(DivisionByZero)
}

fn divide_and_wrap(numerator: i64, denominator: i64) -> (CapturedResult<i64>, u32) {
    (divide(numerator, denominator).capture(), line!())
}

#[test]
fn test_division_by_zero_scenario() {
    let (result, line) = divide_and_wrap(1, 0);
    let err = result.unwrap_err();

    assert_eq!(
        err.describe(),
        format!(
            "Error occurred in script [{}] at line number [{}] error message [division by zero]",
            file!(),
            line
        )
    );
}

#[test]
fn test_successful_result_passes_through() {
    let (result, _) = divide_and_wrap(10, 2);
    assert_eq!(result.unwrap(), 5);
}

#[test]
fn test_new_records_call_site() {
    let (err, line) = (CapturedError::new(DivisionByZero), line!());

    assert_eq!(err.location().file(), file!());
    assert_eq!(err.location().line(), line);
}

#[test]
fn test_location_is_not_where_describe_is_called() {
    let (err, line) = (CapturedError::new(DivisionByZero), line!());

    let later = line!();
    let description = err.describe();

    assert!(description.contains(&format!("at line number [{}]", line)));
    assert!(!description.contains(&format!("at line number [{}]", later)));
}

#[test]
fn test_describe_is_deterministic() {
    let err = CapturedError::new(DivisionByZero);

    let first = err.describe();
    let second = err.describe();

    assert_eq!(first, second);
    assert_eq!(first, err.to_string());
}

#[test]
fn test_underlying_message_is_preserved_verbatim() {
    let message = "upstream said: [brackets] and \"quotes\" survive";
    let io = std::io::Error::other(message);

    let err = CapturedError::new(io);

    assert!(err.describe().contains(message));
    assert!(err.describe().ends_with(&format!("error message [{}]", message)));
}

#[test]
fn test_underlying_is_stored_unchanged() {
    let err = CapturedError::new(DivisionByZero);

    assert_eq!(err.downcast_ref::<DivisionByZero>(), Some(&DivisionByZero));
    assert!(err.downcast_ref::<std::io::Error>().is_none());
    assert_eq!(err.underlying().to_string(), "division by zero");

    let underlying = err.into_underlying();
    assert!(underlying.downcast_ref::<DivisionByZero>().is_some());
}

#[test]
fn test_source_is_underlying() {
    let err = CapturedError::new(DivisionByZero);

    let source = err.source().expect("wrapper always has a source");
    assert_eq!(source.to_string(), "division by zero");
}

#[test]
fn test_location_survives_move_across_threads() {
    let (err, line) = (CapturedError::new(DivisionByZero), line!());

    let description = std::thread::spawn(move || err.describe()).join().unwrap();

    assert!(description.contains(&format!("[{}]", file!())));
    assert!(description.contains(&format!("[{}]", line)));
}

#[test]
fn test_describe_trait_matches_inherent() {
    fn via_trait(err: &dyn Describe) -> (String, u32) {
        (err.describe(), err.location().line())
    }

    let err = CapturedError::new(DivisionByZero);
    let (description, line) = via_trait(&err);

    assert_eq!(description, err.describe());
    assert_eq!(line, err.location().line());
}

#[test]
fn test_propagates_through_question_mark() {
    fn inner() -> CapturedResult<i64> {
        divide(7, 0).capture()
    }

    fn outer() -> CapturedResult<i64> {
        let value = inner()?;
        Ok(value + 1)
    }

    let err = outer().unwrap_err();
    assert!(err.describe().contains("error message [division by zero]"));
}

#[test]
fn test_report_does_not_consume() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let err = CapturedError::new(DivisionByZero);
    err.report();

    assert!(err.describe().contains("division by zero"));
}
