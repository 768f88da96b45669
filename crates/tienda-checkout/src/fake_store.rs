//! # Fake Store
//!
//! Scripted in-memory [`OrderStore`] for exercising the checkout pipeline
//! without a database.
//!
//! Everything is public on purpose: tests poke failure flags in and read
//! recorded calls out directly. Counters are atomics and collections sit
//! behind async mutexes so a fake can be shared through an `Arc` with the
//! submitter under test.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use tienda_core::OrderSnapshot;

use crate::store::{OrderStore, PersistenceError};

/// In-memory [`OrderStore`] with scripted failures.
pub struct FakeStore {
    /// Snapshots received by `create_order`, in arrival order.
    pub orders: Mutex<Vec<OrderSnapshot>>,

    /// `(product_id, quantity)` pairs in the order decrements arrived.
    /// Attempts are recorded whether or not they fail.
    pub decrements: Mutex<Vec<(i64, i64)>>,

    /// Number of times `create_order` was invoked.
    pub create_order_calls: AtomicU64,

    /// Number of times `decrement_stock` was invoked.
    pub decrement_calls: AtomicU64,

    /// When set, `create_order` fails after recording the call.
    pub fail_create_order: AtomicBool,

    /// Product ids whose decrement fails after being recorded.
    pub failing_decrements: Mutex<Vec<i64>>,

    /// Optional gate: `create_order` parks here until notified, letting a
    /// test hold a submission in flight.
    pub create_order_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        FakeStore {
            orders: Mutex::new(Vec::new()),
            decrements: Mutex::new(Vec::new()),
            create_order_calls: AtomicU64::new(0),
            decrement_calls: AtomicU64::new(0),
            fail_create_order: AtomicBool::new(false),
            failing_decrements: Mutex::new(Vec::new()),
            create_order_gate: Mutex::new(None),
        }
    }
}

impl Default for FakeStore {
    fn default() -> Self {
        FakeStore::new()
    }
}

#[async_trait]
impl OrderStore for FakeStore {
    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String, PersistenceError> {
        self.create_order_calls.fetch_add(1, Ordering::Relaxed);

        let gate = self.create_order_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_create_order.load(Ordering::Relaxed) {
            return Err(PersistenceError("fake store refused create_order".to_string()));
        }

        let mut orders = self.orders.lock().await;
        orders.push(snapshot.clone());
        Ok(format!("fake-order-{}", orders.len()))
    }

    async fn decrement_stock(
        &self,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), PersistenceError> {
        self.decrement_calls.fetch_add(1, Ordering::Relaxed);
        self.decrements.lock().await.push((product_id, quantity));

        if self.failing_decrements.lock().await.contains(&product_id) {
            return Err(PersistenceError(format!(
                "fake store refused decrement for product {product_id}"
            )));
        }
        Ok(())
    }
}
