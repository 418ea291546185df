//! Metal rates and the catalyst price list.

use backoffice_core::validation::validate_search_query;
use backoffice_core::{CatalystPrice, MetalRate};

use crate::boundary::HttpBoundary;
use crate::error::{RemoteOperationError, RemoteResult};
use crate::facade::ResourceClient;

pub async fn fetch_metal_rates<B: HttpBoundary>(
    client: &ResourceClient<B>,
) -> RemoteResult<Vec<MetalRate>> {
    client
        .perform(
            |b, options| async move { b.get("metal-rates", options).await },
            None,
            "Failed to load metal rates",
        )
        .await
}

/// Lists catalyst prices, optionally filtered by code or brand.
pub async fn fetch_catalyst_prices<B: HttpBoundary>(
    client: &ResourceClient<B>,
    query: Option<&str>,
) -> RemoteResult<Vec<CatalystPrice>> {
    let query = query
        .map(validate_search_query)
        .transpose()
        .map_err(|e| RemoteOperationError::new(e.to_string()))?
        .filter(|q| !q.is_empty());

    client
        .perform(
            move |b, mut options| async move {
                if let Some(query) = query {
                    options = options.param("query", query);
                }
                b.get("catalyst-prices", options).await
            },
            None,
            "Failed to load catalyst prices",
        )
        .await
}
