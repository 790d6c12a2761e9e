//! Warehouse order fulfillment
//!
//! `POST /Warehouse/AddProductToWarehouse` lands in [`FulfillmentService`],
//! which runs the product/warehouse checks, the open-order match, the
//! fulfillment update and the stock-movement insert on one transaction.

pub mod db;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod memory;

pub use db::PgFulfillmentStore;
pub use error::FulfillmentError;
pub use service::FulfillmentService;
pub use store::{FulfillmentStore, FulfillmentTx};
pub use types::{FulfillOrderRequest, FulfillOrderResponse, NewStockMovement, OpenOrder};
