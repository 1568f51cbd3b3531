//! Probe error types.

/// Probe error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProbeErrorKind {
    /// Neither connection string variable is set
    #[display("No connection string: set {} or {}", _0, _1)]
    MissingConnectionString(&'static str, &'static str),
    /// Configuration could not be loaded
    #[display("Configuration error: {}", _0)]
    Config(String),
    /// Connection string could not be parsed
    #[display("Invalid connection string: {}", _0)]
    InvalidConnectionString(String),
    /// Client could not be created
    #[display("Connection error: {}", _0)]
    Connection(String),
    /// The ping command failed
    #[display("Ping failed: {}", _0)]
    Ping(String),
}

/// Probe error with source location tracking.
///
/// # Examples
///
/// ```
/// use netsec_probe::{ProbeError, ProbeErrorKind};
///
/// let err = ProbeError::new(ProbeErrorKind::Ping("timed out".to_string()));
/// assert!(format!("{}", err).contains("Ping failed: timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Probe Error: {} at line {} in {}", kind, line, file)]
pub struct ProbeError {
    /// The kind of error that occurred
    pub kind: ProbeErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProbeError {
    /// Create a new ProbeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProbeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ProbeErrorKind {
        &self.kind
    }
}

impl From<config::ConfigError> for ProbeError {
    #[track_caller]
    fn from(err: config::ConfigError) -> Self {
        ProbeError::new(ProbeErrorKind::Config(err.to_string()))
    }
}

/// Result type for probe operations.
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
