//! Shared helpers for commands that poll Galaxy servers.

use std::time::SystemTime;

use gcat_catalog::{
    Catalog, CatalogError, IngestReport, InstanceId, ingest_tools, register_instance,
};
use thiserror::Error;
use tracing::info;

use crate::galaxy::{GalaxyClient, GalaxyError};

/// Why polling one server failed.
#[derive(Debug, Error)]
pub enum PollError {
    /// The server could not be reached or returned bad data.
    #[error(transparent)]
    Galaxy(#[from] GalaxyError),
    /// The catalog rejected the update.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fetches a server's configuration and tools and merges them into `catalog`.
///
/// Both payloads are fetched before the catalog is touched, so a failure leaves the
/// catalog unchanged.
pub fn poll_instance(
    client: &GalaxyClient,
    catalog: &mut Catalog,
    url: &str,
) -> Result<(InstanceId, IngestReport), PollError> {
    info!(url, "polling instance");
    let config = client.fetch_config(url)?;
    let tools = client.fetch_tools(url)?;

    let id = register_instance(catalog, url, &config, SystemTime::now());
    let report = ingest_tools(catalog, id, &tools)?;
    Ok((id, report))
}

/// One-line summary of an ingestion run.
pub fn describe_report(report: &IngestReport) -> String {
    format!(
        "{} tools ({} new), {} new versions",
        report.tools_created + report.tools_updated,
        report.tools_created,
        report.versions_created
    )
}
