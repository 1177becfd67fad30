//! Search entry point combining parsing and evaluation.

use gcat_query::{QueryError, parse};
use tracing::trace;

use crate::{CatalogAccessor, EvaluateOptions, Tool, evaluate};

/// Searches `catalog` for tools matching the raw query string.
///
/// Blank input returns no tools. Malformed quoting is returned as a `QueryError`;
/// unresolvable filters are not errors and simply yield no tools.
pub fn search<C: CatalogAccessor + ?Sized>(
    raw_query: &str,
    catalog: &C,
    options: EvaluateOptions,
) -> Result<Vec<Tool>, QueryError> {
    if raw_query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let query = parse(raw_query)?;
    trace!(query = %query.to_query_string(), nodes = query.len(), "parsed search query");
    Ok(evaluate(&query, catalog, options))
}
