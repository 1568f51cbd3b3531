//! Extension trait for wrapping failures at the point they are handled.

use crate::CapturedError;

/// Wrap the error of a `Result` in a [`CapturedError`] located at the call.
///
/// # Examples
///
/// ```
/// use netsec_error::CaptureExt;
///
/// fn parse(input: &str) -> Result<u16, netsec_error::CapturedError> {
///     input.parse::<u16>().capture()
/// }
///
/// let err = parse("seventy").unwrap_err();
/// assert!(err.describe().contains("invalid digit found in string"));
/// ```
pub trait CaptureExt<T> {
    /// Convert the error, recording the caller's file and line.
    fn capture(self) -> Result<T, CapturedError>;
}

impl<T, E> CaptureExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn capture(self) -> Result<T, CapturedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(CapturedError::new(err)),
        }
    }
}
