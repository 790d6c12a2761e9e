//! Order fulfillment: match an open order, mark it fulfilled and record the
//! stock movement, all on one transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::FulfillmentError;
use super::store::{FulfillmentStore, FulfillmentTx};
use super::types::{FulfillOrderRequest, NewStockMovement};

pub struct FulfillmentService {
    store: Arc<dyn FulfillmentStore>,
}

impl FulfillmentService {
    pub fn new(store: Arc<dyn FulfillmentStore>) -> Self {
        Self { store }
    }

    /// Fulfill the oldest open order matching `req` and return the new
    /// `IdProductWarehouse`.
    ///
    /// Either the order update and the stock movement insert are both
    /// committed, or the transaction is rolled back and nothing changes.
    pub async fn add_product_to_warehouse(
        &self,
        req: &FulfillOrderRequest,
    ) -> Result<i32, FulfillmentError> {
        if req.amount <= 0 {
            return Err(FulfillmentError::InvalidAmount);
        }

        let mut tx = self.store.begin().await?;

        match Self::fulfill(tx.as_mut(), req).await {
            Ok(id_product_warehouse) => {
                tx.commit().await?;
                info!(
                    id_product = req.id_product,
                    id_warehouse = req.id_warehouse,
                    amount = req.amount,
                    id_product_warehouse,
                    "Order fulfilled"
                );
                Ok(id_product_warehouse)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                debug!(
                    id_product = req.id_product,
                    id_warehouse = req.id_warehouse,
                    error = %e,
                    "Fulfillment rejected, transaction rolled back"
                );
                Err(e)
            }
        }
    }

    async fn fulfill(
        tx: &mut dyn FulfillmentTx,
        req: &FulfillOrderRequest,
    ) -> Result<i32, FulfillmentError> {
        if !tx.product_exists(req.id_product).await? {
            return Err(FulfillmentError::ProductNotFound);
        }

        if !tx.warehouse_exists(req.id_warehouse).await? {
            return Err(FulfillmentError::WarehouseNotFound);
        }

        let order = tx
            .find_open_order(req.id_product, req.amount, req.created_at)
            .await?
            .ok_or(FulfillmentError::NoMatchingOrder)?;

        let price = order
            .unit_price
            .checked_mul(Decimal::from(req.amount))
            .ok_or(FulfillmentError::PriceOverflow {
                unit_price: order.unit_price,
                amount: req.amount,
            })?;

        let now = Utc::now();
        tx.mark_order_fulfilled(order.id_order, now).await?;

        tx.insert_stock_movement(&NewStockMovement {
            id_warehouse: req.id_warehouse,
            id_product: req.id_product,
            id_order: order.id_order,
            amount: req.amount,
            price,
            created_at: now,
        })
        .await
    }
}
