//! Customer lookup and registration.

use backoffice_core::validation::validate_search_query;
use backoffice_core::{Customer, NewCustomer};

use crate::boundary::HttpBoundary;
use crate::error::{RemoteOperationError, RemoteResult};
use crate::facade::ResourceClient;
use crate::services::to_body;

pub async fn fetch_customers<B: HttpBoundary>(
    client: &ResourceClient<B>,
) -> RemoteResult<Vec<Customer>> {
    client
        .perform(
            |b, options| async move { b.get("customers", options).await },
            None,
            "Failed to load customers",
        )
        .await
}

/// Searches by name, phone or passport number. A blank query lists all
/// customers.
pub async fn search_customers<B: HttpBoundary>(
    client: &ResourceClient<B>,
    query: &str,
) -> RemoteResult<Vec<Customer>> {
    let query = validate_search_query(query).map_err(|e| RemoteOperationError::new(e.to_string()))?;
    if query.is_empty() {
        return fetch_customers(client).await;
    }

    client
        .perform(
            move |b, options| async move {
                b.get("customers/search", options.param("query", query)).await
            },
            None,
            "Failed to search customers",
        )
        .await
}

pub async fn create_customer<B: HttpBoundary>(
    client: &ResourceClient<B>,
    customer: &NewCustomer,
) -> RemoteResult<Customer> {
    const FAILED: &str = "Failed to create customer";

    if customer.full_name.trim().is_empty() {
        return Err(RemoteOperationError::new("Customer name is required"));
    }
    let body = to_body(customer, FAILED)?;

    client
        .perform(
            move |b, options| async move { b.post("customers", Some(body), options).await },
            None,
            FAILED,
        )
        .await
}
