//! Connectivity check for the netsec document database.
//!
//! Reads a connection string from `MONGO_DB_URL` (falling back to
//! `MONGODB_URL_KEY`) and issues a single `ping` command.
//!
//! # Examples
//!
//! ```no_run
//! use netsec_probe::{ProbeConfig, ProbeOutcome, ping};
//!
//! # async fn run() -> netsec_probe::ProbeResult<()> {
//! let config = ProbeConfig::load()?;
//! let outcome = ProbeOutcome::from(ping(&config).await);
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod ping;
mod report;

pub use config::{CONNECTION_STRING_VARS, ConfigOverrides, ProbeConfig, resolve_connection_string};
pub use error::{ProbeError, ProbeErrorKind, ProbeResult};
pub use ping::{client_options, ping};
pub use report::{PREVIEW_CHARS, ProbeOutcome, preview};
