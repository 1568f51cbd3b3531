//! Errors raised while building a wrapper.

/// A wrapper was requested from the panic context while no panic had been
/// recorded on the current thread.
///
/// This is a programming error: wrappers belong inside failure handlers.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Capture Error: no failure is being handled at line {} in {}",
    line,
    file
)]
pub struct NoActiveFailure {
    /// Line number of the faulty call
    pub line: u32,
    /// File of the faulty call
    pub file: &'static str,
}

impl NoActiveFailure {
    /// Create a new error at the caller's location.
    #[track_caller]
    pub fn new() -> Self {
        let location = std::panic::Location::caller();
        Self {
            line: location.line(),
            file: location.file(),
        }
    }
}
