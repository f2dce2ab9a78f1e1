use std::sync::Arc;

use sqlx::PgPool;

use scoopshop_catalog::ItemStore;
use scoopshop_infra::{InMemoryCatalog, InMemoryOrderStore, PostgresCatalog, PostgresOrderStore};
use scoopshop_orders::OrderService;

/// Everything the handlers need, behind `Arc` extensions.
///
/// The same struct backs production (Postgres) and the black-box tests
/// (in-memory); handlers never know which one they got.
pub struct AppServices {
    items: Arc<dyn ItemStore>,
    orders: OrderService,
}

impl AppServices {
    pub fn postgres(pool: PgPool) -> Self {
        let catalog = Arc::new(PostgresCatalog::new(pool.clone()));
        let order_store = Arc::new(PostgresOrderStore::new(pool));
        Self {
            items: catalog.clone(),
            orders: OrderService::new(catalog.clone(), catalog, order_store),
        }
    }

    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let order_store = Arc::new(InMemoryOrderStore::new());
        Self {
            items: catalog.clone(),
            orders: OrderService::new(catalog.clone(), catalog, order_store),
        }
    }

    pub fn items(&self) -> &dyn ItemStore {
        self.items.as_ref()
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }
}
