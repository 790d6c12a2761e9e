//! Warehouse Fulfillment Service
//!
//! Records fulfillment of warehouse orders over HTTP.
//!
//! # Modules
//!
//! - [`fulfillment`] - Order matching, fulfillment and stock movements (one transaction)
//! - [`gateway`] - Axum router, handlers, health check and OpenAPI docs
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod fulfillment;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use db::Database;
pub use fulfillment::{
    FulfillOrderRequest, FulfillOrderResponse, FulfillmentError, FulfillmentService,
    FulfillmentStore, PgFulfillmentStore,
};
