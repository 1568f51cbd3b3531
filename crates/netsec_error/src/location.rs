//! Source location captured when a failure is wrapped.

use std::borrow::Cow;

/// File, line and column where a failure was caught or raised.
///
/// Locations are owned data: once captured they stay valid regardless of
/// what happens to the frame or panic they were read from.
///
/// # Examples
///
/// ```
/// use netsec_error::SourceLocation;
///
/// let location = SourceLocation::caller();
/// assert_eq!(location.file(), file!());
/// assert_eq!(location.line(), line!() - 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}:{}:{}", file, line, column)]
pub struct SourceLocation {
    file: Cow<'static, str>,
    line: u32,
    column: u32,
}

impl SourceLocation {
    /// Create a location from explicit parts.
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location of the caller, propagated through `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        let location: &'static std::panic::Location<'static> = std::panic::Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            column: location.column(),
        }
    }

    /// Source file name as reported by the compiler.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// One-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// One-based column number.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl From<&std::panic::Location<'_>> for SourceLocation {
    fn from(location: &std::panic::Location<'_>) -> Self {
        Self {
            file: Cow::Owned(location.file().to_string()),
            line: location.line(),
            column: location.column(),
        }
    }
}
