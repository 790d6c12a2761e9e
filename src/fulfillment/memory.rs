//! In-memory fulfillment store for tests
//!
//! Each transaction works on a private copy of the tables and publishes it
//! on commit, so a rolled back or failed transaction leaves no trace.
//! Failures can be injected at a chosen [`Step`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::error::FulfillmentError;
use super::store::{FulfillmentStore, FulfillmentTx};
use super::types::{NewStockMovement, OpenOrder};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Point at which an injected failure fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Begin,
    InsertStockMovement,
    Commit,
}

#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id_order: i32,
    pub id_product: i32,
    pub amount: i32,
    pub created_at: DateTime<Utc>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Tables {
    products: BTreeMap<i32, Decimal>,
    warehouses: BTreeSet<i32>,
    orders: BTreeMap<i32, OrderRow>,
    movements: BTreeMap<i32, NewStockMovement>,
    next_movement_id: i32,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            warehouses: BTreeSet::new(),
            orders: BTreeMap::new(),
            movements: BTreeMap::new(),
            next_movement_id: 1,
        }
    }
}

fn injected(step: Step) -> FulfillmentError {
    FulfillmentError::Database(sqlx::Error::Protocol(format!(
        "injected failure at {:?}",
        step
    )))
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_at: Mutex<Option<Step>>,
    opened: AtomicUsize,
    rollbacks: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&self, id_product: i32, price: Decimal) {
        self.tables.lock().unwrap().products.insert(id_product, price);
    }

    pub fn add_warehouse(&self, id_warehouse: i32) {
        self.tables.lock().unwrap().warehouses.insert(id_warehouse);
    }

    pub fn add_order(&self, id_order: i32, id_product: i32, amount: i32, created_at: DateTime<Utc>) {
        self.tables.lock().unwrap().orders.insert(
            id_order,
            OrderRow {
                id_order,
                id_product,
                amount,
                created_at,
                fulfilled_at: None,
            },
        );
    }

    /// Record a stock movement for `id_order` without going through the service
    pub fn link_existing_movement(&self, id_order: i32, id_warehouse: i32) {
        let mut tables = self.tables.lock().unwrap();
        let order = tables.orders[&id_order].clone();
        let id = tables.next_movement_id;
        tables.next_movement_id += 1;
        tables.movements.insert(
            id,
            NewStockMovement {
                id_warehouse,
                id_product: order.id_product,
                id_order,
                amount: order.amount,
                price: Decimal::ZERO,
                created_at: order.created_at,
            },
        );
    }

    /// Set `FulfilledAt` without linking a stock movement
    pub fn set_fulfilled(&self, id_order: i32, fulfilled_at: DateTime<Utc>) {
        if let Some(order) = self.tables.lock().unwrap().orders.get_mut(&id_order) {
            order.fulfilled_at = Some(fulfilled_at);
        }
    }

    pub fn fail_at(&self, step: Step) {
        *self.fail_at.lock().unwrap() = Some(step);
    }

    pub fn order(&self, id_order: i32) -> Option<OrderRow> {
        self.tables.lock().unwrap().orders.get(&id_order).cloned()
    }

    pub fn stock_movements(&self) -> Vec<(i32, NewStockMovement)> {
        self.tables
            .lock()
            .unwrap()
            .movements
            .iter()
            .map(|(id, m)| (*id, m.clone()))
            .collect()
    }

    pub fn transactions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FulfillmentStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn FulfillmentTx>, FulfillmentError> {
        let fail_at = *self.fail_at.lock().unwrap();
        if fail_at == Some(Step::Begin) {
            return Err(injected(Step::Begin));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);

        let staged = self.tables.lock().unwrap().clone();
        Ok(Box::new(MemoryTx {
            committed: self.tables.clone(),
            staged,
            fail_at,
            rollbacks: self.rollbacks.clone(),
        }))
    }
}

pub struct MemoryTx {
    committed: Arc<Mutex<Tables>>,
    staged: Tables,
    fail_at: Option<Step>,
    rollbacks: Arc<AtomicUsize>,
}

#[async_trait]
impl FulfillmentTx for MemoryTx {
    async fn product_exists(&mut self, id_product: i32) -> Result<bool, FulfillmentError> {
        Ok(self.staged.products.contains_key(&id_product))
    }

    async fn warehouse_exists(&mut self, id_warehouse: i32) -> Result<bool, FulfillmentError> {
        Ok(self.staged.warehouses.contains(&id_warehouse))
    }

    async fn find_open_order(
        &mut self,
        id_product: i32,
        amount: i32,
        created_before: DateTime<Utc>,
    ) -> Result<Option<OpenOrder>, FulfillmentError> {
        let linked: BTreeSet<i32> = self.staged.movements.values().map(|m| m.id_order).collect();

        // BTreeMap iterates in id order: lowest matching IdOrder wins
        let found = self.staged.orders.values().find(|o| {
            o.id_product == id_product
                && o.amount == amount
                && o.created_at < created_before
                && o.fulfilled_at.is_none()
                && !linked.contains(&o.id_order)
        });

        Ok(found.map(|o| OpenOrder {
            id_order: o.id_order,
            unit_price: self.staged.products[&o.id_product],
        }))
    }

    async fn mark_order_fulfilled(
        &mut self,
        id_order: i32,
        fulfilled_at: DateTime<Utc>,
    ) -> Result<(), FulfillmentError> {
        let order = self
            .staged
            .orders
            .get_mut(&id_order)
            .ok_or(FulfillmentError::Database(sqlx::Error::RowNotFound))?;
        order.fulfilled_at = Some(fulfilled_at);
        Ok(())
    }

    async fn insert_stock_movement(
        &mut self,
        movement: &NewStockMovement,
    ) -> Result<i32, FulfillmentError> {
        if self.fail_at == Some(Step::InsertStockMovement) {
            return Err(injected(Step::InsertStockMovement));
        }
        if self
            .staged
            .movements
            .values()
            .any(|m| m.id_order == movement.id_order)
        {
            return Err(FulfillmentError::NoMatchingOrder);
        }

        let id = self.staged.next_movement_id;
        self.staged.next_movement_id += 1;
        self.staged.movements.insert(id, movement.clone());
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), FulfillmentError> {
        if self.fail_at == Some(Step::Commit) {
            return Err(injected(Step::Commit));
        }
        let MemoryTx {
            committed, staged, ..
        } = *self;
        *committed.lock().unwrap() = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), FulfillmentError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
