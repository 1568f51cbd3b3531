//! The error context wrapper.

use crate::{NoActiveFailure, SourceLocation, panic};

/// Boxed underlying failure.
pub type Underlying = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An underlying failure annotated with the location it was caught at.
///
/// The location is recorded once, when the wrapper is built, and never
/// changes afterwards. The underlying failure is kept as-is and is exposed
/// through [`std::error::Error::source`].
///
/// # Examples
///
/// ```
/// use netsec_error::CapturedError;
///
/// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
/// let err = CapturedError::new(io);
///
/// assert!(err.describe().starts_with("Error occurred in script ["));
/// assert!(err.describe().ends_with("error message [config.toml]"));
/// ```
#[derive(Debug, derive_more::Display)]
#[display(
    "Error occurred in script [{}] at line number [{}] error message [{}]",
    location.file(),
    location.line(),
    underlying
)]
pub struct CapturedError {
    underlying: Underlying,
    location: SourceLocation,
}

impl CapturedError {
    /// Wrap `err`, recording the caller's location.
    #[track_caller]
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(err))
    }

    /// Wrap an already boxed failure, recording the caller's location.
    #[track_caller]
    pub fn from_boxed(underlying: Underlying) -> Self {
        Self::with_location(underlying, SourceLocation::caller())
    }

    /// Wrap a failure at an explicitly supplied location.
    pub fn with_location(underlying: Underlying, location: SourceLocation) -> Self {
        Self {
            underlying,
            location,
        }
    }

    /// Wrap the panic that produced `payload`, as returned by
    /// `std::panic::catch_unwind`.
    ///
    /// The hook must be installed (see [`install_hook`](crate::install_hook))
    /// before the panic. The recorded panic is consumed, so a second call for
    /// the same payload fails.
    ///
    /// # Errors
    ///
    /// Returns [`NoActiveFailure`] when this thread holds no record for
    /// `payload`: the payload never went through the hook (for example it was
    /// rethrown with `resume_unwind`), or the record was already taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use netsec_error::{CapturedError, install_hook};
    ///
    /// install_hook();
    /// let payload = std::panic::catch_unwind(|| panic!("lost connection")).unwrap_err();
    /// let err = CapturedError::from_panic(payload.as_ref()).unwrap();
    /// assert!(err.describe().ends_with("error message [lost connection]"));
    ///
    /// let err = CapturedError::from_panic(payload.as_ref()).unwrap_err();
    /// assert!(err.to_string().contains("no failure is being handled"));
    /// ```
    #[track_caller]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Result<Self, NoActiveFailure> {
        match panic::take_record_for(payload) {
            Some(record) => Ok(record.into_captured()),
            None => Err(NoActiveFailure::new()),
        }
    }

    /// Formatted diagnostic naming the file, line and underlying message.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Where the failure was caught.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The wrapped failure.
    pub fn underlying(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.underlying.as_ref()
    }

    /// Borrow the wrapped failure as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.underlying.downcast_ref::<E>()
    }

    /// Give up the annotation and return the wrapped failure.
    pub fn into_underlying(self) -> Underlying {
        self.underlying
    }

    /// Emit this failure as a single `error` event.
    pub fn report(&self) {
        tracing::error!(
            file = self.location.file(),
            line = self.location.line(),
            message = %self.underlying,
            "{}",
            self
        );
    }
}

impl std::error::Error for CapturedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.underlying.as_ref())
    }
}

/// Capability shared by errors that carry a source location.
pub trait Describe {
    /// Human-readable diagnostic.
    fn describe(&self) -> String;

    /// Where the failure originated.
    fn location(&self) -> &SourceLocation;
}

impl Describe for CapturedError {
    fn describe(&self) -> String {
        CapturedError::describe(self)
    }

    fn location(&self) -> &SourceLocation {
        CapturedError::location(self)
    }
}

/// Result type for operations whose failures are wrapped.
pub type CapturedResult<T> = std::result::Result<T, CapturedError>;
