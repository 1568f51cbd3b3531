//! Error wrapper that records where a failure was caught.
//!
//! [`CapturedError`] keeps an underlying failure together with the file and
//! line at which it was handled, and renders both in a fixed diagnostic
//! format:
//!
//! ```text
//! Error occurred in script [<file>] at line number [<line>] error message [<message>]
//! ```
//!
//! Locations come from one of two places:
//! - `#[track_caller]` on [`CapturedError::new`] and [`CaptureExt::capture`],
//!   which record the call site that caught the failure
//! - a per-thread panic record, read by [`capture_panic`] and
//!   [`CapturedError::from_panic`], which records the panic site
//!
//! # Examples
//!
//! ```
//! use netsec_error::{CaptureExt, CapturedResult};
//!
//! fn read_config(path: &str) -> CapturedResult<String> {
//!     std::fs::read_to_string(path).capture()
//! }
//!
//! if let Err(e) = read_config("/nonexistent/netsec.toml") {
//!     assert!(e.describe().starts_with("Error occurred in script ["));
//!     e.report();
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod captured;
mod error;
mod ext;
mod location;
mod panic;

pub use captured::{CapturedError, CapturedResult, Describe, Underlying};
pub use error::NoActiveFailure;
pub use ext::CaptureExt;
pub use location::SourceLocation;
pub use panic::{PanicFailure, capture_panic, install_hook};
