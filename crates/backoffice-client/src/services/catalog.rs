//! Products, warehouses and shops. None of these calls are register-scoped.

use backoffice_core::validation::validate_search_query;
use backoffice_core::{Product, ProductDraft, Shop, ShopDraft, Warehouse, WarehouseDraft};

use crate::boundary::HttpBoundary;
use crate::error::{RemoteOperationError, RemoteResult};
use crate::facade::ResourceClient;
use crate::services::to_body;

// =============================================================================
// Products
// =============================================================================

/// Lists products, optionally filtered by a name/SKU/barcode query.
pub async fn fetch_products<B: HttpBoundary>(
    client: &ResourceClient<B>,
    query: Option<&str>,
) -> RemoteResult<Vec<Product>> {
    const FAILED: &str = "Failed to load products";

    let query = match query {
        Some(raw) => Some(
            validate_search_query(raw).map_err(|e| RemoteOperationError::new(e.to_string()))?,
        ),
        None => None,
    };

    client
        .perform(
            move |b, mut options| async move {
                if let Some(query) = query.filter(|q| !q.is_empty()) {
                    options = options.param("query", query);
                }
                b.get("products", options).await
            },
            None,
            FAILED,
        )
        .await
}

pub async fn fetch_product<B: HttpBoundary>(
    client: &ResourceClient<B>,
    id: i64,
) -> RemoteResult<Product> {
    let path = format!("products/{}", id);
    client
        .perform(
            move |b, options| async move { b.get(&path, options).await },
            None,
            "Failed to load product",
        )
        .await
}

pub async fn create_product<B: HttpBoundary>(
    client: &ResourceClient<B>,
    draft: &ProductDraft,
) -> RemoteResult<Product> {
    const FAILED: &str = "Failed to create product";
    let body = to_body(draft, FAILED)?;
    client
        .perform(
            move |b, options| async move { b.post("products", Some(body), options).await },
            None,
            FAILED,
        )
        .await
}

pub async fn update_product<B: HttpBoundary>(
    client: &ResourceClient<B>,
    id: i64,
    draft: &ProductDraft,
) -> RemoteResult<Product> {
    const FAILED: &str = "Failed to update product";
    let body = to_body(draft, FAILED)?;
    let path = format!("products/{}", id);
    client
        .perform(
            move |b, options| async move { b.put(&path, Some(body), options).await },
            None,
            FAILED,
        )
        .await
}

pub async fn delete_product<B: HttpBoundary>(
    client: &ResourceClient<B>,
    id: i64,
) -> RemoteResult<()> {
    let path = format!("products/{}", id);
    client
        .perform(
            move |b, options| async move { b.delete(&path, options).await },
            None,
            "Failed to delete product",
        )
        .await
}

// =============================================================================
// Warehouses
// =============================================================================

pub async fn fetch_warehouses<B: HttpBoundary>(
    client: &ResourceClient<B>,
) -> RemoteResult<Vec<Warehouse>> {
    client
        .perform(
            |b, options| async move { b.get("warehouses", options).await },
            None,
            "Failed to load warehouses",
        )
        .await
}

pub async fn create_warehouse<B: HttpBoundary>(
    client: &ResourceClient<B>,
    draft: &WarehouseDraft,
) -> RemoteResult<Warehouse> {
    const FAILED: &str = "Failed to create warehouse";
    let body = to_body(draft, FAILED)?;
    client
        .perform(
            move |b, options| async move { b.post("warehouses", Some(body), options).await },
            None,
            FAILED,
        )
        .await
}

pub async fn delete_warehouse<B: HttpBoundary>(
    client: &ResourceClient<B>,
    id: i64,
) -> RemoteResult<()> {
    let path = format!("warehouses/{}", id);
    client
        .perform(
            move |b, options| async move { b.delete(&path, options).await },
            None,
            "Failed to delete warehouse",
        )
        .await
}

// =============================================================================
// Shops
// =============================================================================

pub async fn fetch_shops<B: HttpBoundary>(client: &ResourceClient<B>) -> RemoteResult<Vec<Shop>> {
    client
        .perform(
            |b, options| async move { b.get("shops", options).await },
            None,
            "Failed to load shops",
        )
        .await
}

pub async fn create_shop<B: HttpBoundary>(
    client: &ResourceClient<B>,
    draft: &ShopDraft,
) -> RemoteResult<Shop> {
    const FAILED: &str = "Failed to create shop";
    let body = to_body(draft, FAILED)?;
    client
        .perform(
            move |b, options| async move { b.post("shops", Some(body), options).await },
            None,
            FAILED,
        )
        .await
}

pub async fn delete_shop<B: HttpBoundary>(client: &ResourceClient<B>, id: i64) -> RemoteResult<()> {
    let path = format!("shops/{}", id);
    client
        .perform(
            move |b, options| async move { b.delete(&path, options).await },
            None,
            "Failed to delete shop",
        )
        .await
}
