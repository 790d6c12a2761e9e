use std::sync::Arc;

use crate::db::Database;
use crate::fulfillment::FulfillmentService;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Order fulfillment (one transaction per request)
    pub fulfillment: Arc<FulfillmentService>,
    /// PostgreSQL pool, used by the health check. `None` reports unhealthy.
    pub pg_db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(fulfillment: Arc<FulfillmentService>, pg_db: Option<Arc<Database>>) -> Self {
        Self { fulfillment, pg_db }
    }
}
