//! Fulfillment Database Layer
//!
//! PostgreSQL implementation of the fulfillment store. The open-order lookup
//! locks the selected `Order` row (`FOR UPDATE OF o`). A request blocked on
//! that lock re-checks `"FulfilledAt" IS NULL` once the holder commits and
//! moves on to the next open order. `Product_Warehouse` carries a unique
//! constraint on `IdOrder`, so the same order is never linked twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};

use super::error::FulfillmentError;
use super::store::{FulfillmentStore, FulfillmentTx};
use super::types::{NewStockMovement, OpenOrder};

const FIND_OPEN_ORDER_SQL: &str = r#"
    SELECT o."IdOrder", p."Price"
    FROM "Order" o
    JOIN "Product" p ON p."IdProduct" = o."IdProduct"
    WHERE o."IdProduct" = $1
      AND o."Amount" = $2
      AND o."CreatedAt" < $3
      AND o."FulfilledAt" IS NULL
      AND NOT EXISTS (
          SELECT 1 FROM "Product_Warehouse" pw WHERE pw."IdOrder" = o."IdOrder"
      )
    ORDER BY o."IdOrder"
    LIMIT 1
    FOR UPDATE OF o
"#;

const INSERT_STOCK_MOVEMENT_SQL: &str = r#"
    INSERT INTO "Product_Warehouse"
        ("IdWarehouse", "IdProduct", "IdOrder", "Amount", "Price", "CreatedAt")
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING "IdProductWarehouse"
"#;

/// PostgreSQL-backed fulfillment store
#[derive(Clone)]
pub struct PgFulfillmentStore {
    pool: PgPool,
}

impl PgFulfillmentStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FulfillmentStore for PgFulfillmentStore {
    async fn begin(&self) -> Result<Box<dyn FulfillmentTx>, FulfillmentError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgFulfillmentTx { tx }))
    }
}

/// One open PostgreSQL transaction. Dropping it without commit rolls back.
pub struct PgFulfillmentTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl FulfillmentTx for PgFulfillmentTx {
    async fn product_exists(&mut self, id_product: i32) -> Result<bool, FulfillmentError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(1) FROM "Product" WHERE "IdProduct" = $1"#,
        )
        .bind(id_product)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(count > 0)
    }

    async fn warehouse_exists(&mut self, id_warehouse: i32) -> Result<bool, FulfillmentError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(1) FROM "Warehouse" WHERE "IdWarehouse" = $1"#,
        )
        .bind(id_warehouse)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(count > 0)
    }

    async fn find_open_order(
        &mut self,
        id_product: i32,
        amount: i32,
        created_before: DateTime<Utc>,
    ) -> Result<Option<OpenOrder>, FulfillmentError> {
        let row = sqlx::query(FIND_OPEN_ORDER_SQL)
            .bind(id_product)
            .bind(amount)
            .bind(created_before)
            .fetch_optional(&mut *self.tx)
            .await?;

        match row {
            Some(row) => Ok(Some(OpenOrder {
                id_order: row.try_get::<i32, _>("IdOrder")?,
                unit_price: row.try_get::<Decimal, _>("Price")?,
            })),
            None => Ok(None),
        }
    }

    async fn mark_order_fulfilled(
        &mut self,
        id_order: i32,
        fulfilled_at: DateTime<Utc>,
    ) -> Result<(), FulfillmentError> {
        let result =
            sqlx::query(r#"UPDATE "Order" SET "FulfilledAt" = $1 WHERE "IdOrder" = $2"#)
                .bind(fulfilled_at)
                .bind(id_order)
                .execute(&mut *self.tx)
                .await?;

        // The row is locked by find_open_order, so it cannot vanish in between
        if result.rows_affected() != 1 {
            return Err(FulfillmentError::Database(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn insert_stock_movement(
        &mut self,
        movement: &NewStockMovement,
    ) -> Result<i32, FulfillmentError> {
        sqlx::query_scalar::<_, i32>(INSERT_STOCK_MOVEMENT_SQL)
            .bind(movement.id_warehouse)
            .bind(movement.id_product)
            .bind(movement.id_order)
            .bind(movement.amount)
            .bind(movement.price)
            .bind(movement.created_at)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(FulfillmentError::from_insert_error)
    }

    async fn commit(self: Box<Self>) -> Result<(), FulfillmentError> {
        let PgFulfillmentTx { tx } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), FulfillmentError> {
        let PgFulfillmentTx { tx } = *self;
        tx.rollback().await?;
        Ok(())
    }
}
