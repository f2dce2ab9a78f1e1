use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use scoopshop_catalog::{ItemPatch, ItemQuery, NewItem};
use scoopshop_core::{ItemId, Money, money::DEFAULT_CURRENCY};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Storefront catalog: read-only.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/:id", get(get_item))
}

/// Catalog CRUD for shop staff.
pub fn admin_router() -> Router {
    Router::new()
        .route("/", post(create_item))
        .route("/:id", put(update_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let page = match services
        .items()
        .list(ItemQuery {
            search: query.search,
            page: query.page,
            page_size: query.page_size,
        })
        .await
    {
        Ok(page) => page,
        Err(e) => return errors::storage_error_to_response(e),
    };
    (StatusCode::OK, Json(dto::item_page_to_json(&page))).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    match services.items().get(id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::storage_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let currency = body
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let new_item = match NewItem::new(
        body.title,
        body.description,
        Money::new(body.price_minor, currency),
        body.image_url,
        body.stock,
    ) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let item = new_item.into_item();
    if let Err(e) = services.items().insert(&item).await {
        return errors::storage_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": item.id.to_string() })),
    )
        .into_response()
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> axum::response::Response {
    let id: ItemId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"),
    };

    let mut item = match services.items().get(id).await {
        Ok(Some(item)) => item,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => return errors::storage_error_to_response(e),
    };

    if let Err(e) = item.apply_patch(patch) {
        return errors::domain_error_to_response(e);
    }

    match services.items().update(&item).await {
        Ok(true) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::storage_error_to_response(e),
    }
}
