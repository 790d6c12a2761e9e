//! Store seam for the fulfillment transaction
//!
//! [`FulfillmentStore::begin`] hands out one [`FulfillmentTx`] per request.
//! Every read and write of a fulfillment goes through that handle, and the
//! handle is consumed by exactly one of [`FulfillmentTx::commit`] or
//! [`FulfillmentTx::rollback`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::FulfillmentError;
use super::types::{NewStockMovement, OpenOrder};

#[async_trait]
pub trait FulfillmentStore: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> Result<Box<dyn FulfillmentTx>, FulfillmentError>;
}

/// Operations executed inside a single fulfillment transaction
#[async_trait]
pub trait FulfillmentTx: Send {
    async fn product_exists(&mut self, id_product: i32) -> Result<bool, FulfillmentError>;

    async fn warehouse_exists(&mut self, id_warehouse: i32) -> Result<bool, FulfillmentError>;

    /// Lowest-id order for `id_product` with exactly `amount`, created strictly
    /// before `created_before`, with `FulfilledAt` null and not yet linked to a
    /// stock movement.
    /// Implementations lock the returned row until the transaction ends.
    async fn find_open_order(
        &mut self,
        id_product: i32,
        amount: i32,
        created_before: DateTime<Utc>,
    ) -> Result<Option<OpenOrder>, FulfillmentError>;

    async fn mark_order_fulfilled(
        &mut self,
        id_order: i32,
        fulfilled_at: DateTime<Utc>,
    ) -> Result<(), FulfillmentError>;

    /// Insert the stock movement and return its generated id.
    /// A second movement for the same order is `NoMatchingOrder`.
    async fn insert_stock_movement(
        &mut self,
        movement: &NewStockMovement,
    ) -> Result<i32, FulfillmentError>;

    async fn commit(self: Box<Self>) -> Result<(), FulfillmentError>;

    async fn rollback(self: Box<Self>) -> Result<(), FulfillmentError>;
}
