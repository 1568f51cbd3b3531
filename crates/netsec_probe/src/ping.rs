//! Round-trip connectivity check.

use crate::{ProbeConfig, ProbeError, ProbeErrorKind, ProbeResult};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Parse the configured connection string into client options.
///
/// No network traffic happens here unless the string uses `mongodb+srv`,
/// which requires a DNS lookup.
///
/// # Errors
///
/// Returns an error if the connection string is missing or malformed.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn client_options(config: &ProbeConfig) -> ProbeResult<ClientOptions> {
    let url = config.require_connection_string()?;

    let mut options = ClientOptions::parse(url)
        .await
        .map_err(|e| ProbeError::new(ProbeErrorKind::InvalidConnectionString(e.to_string())))?;

    options.app_name = Some(config.app_name.clone());
    options.connect_timeout = Some(config.timeout());
    options.server_selection_timeout = Some(config.timeout());

    debug!(hosts = options.hosts.len(), "Parsed connection string");
    Ok(options)
}

/// Run `{ ping: 1 }` against the configured database.
///
/// Returns the time taken by the round trip, including server selection.
///
/// # Errors
///
/// Returns an error if the connection string is missing or malformed, the
/// client cannot be built, or the server does not answer in time.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn ping(config: &ProbeConfig) -> ProbeResult<Duration> {
    let options = client_options(config).await?;

    let client = Client::with_options(options)
        .map_err(|e| ProbeError::new(ProbeErrorKind::Connection(e.to_string())))?;

    let started = Instant::now();
    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| ProbeError::new(ProbeErrorKind::Ping(e.to_string())))?;
    let elapsed = started.elapsed();

    info!(?elapsed, "Ping succeeded");
    Ok(elapsed)
}
