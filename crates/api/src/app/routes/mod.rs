use axum::Router;

pub mod items;
pub mod orders;
pub mod system;

/// Router for everything except the health probe.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::public_router())
        .nest("/orders", orders::public_router())
        .nest("/admin/items", items::admin_router())
        .nest("/admin/orders", orders::admin_router())
}
