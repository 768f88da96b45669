//! # Order Store
//!
//! The persistence seam between the submission pipeline and whatever
//! actually stores orders and stock.
//!
//! ## Seam Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Persistence Seam                                 │
//! │                                                                         │
//! │                       trait OrderStore                                  │
//! │  OrderSubmitter ──►   • create_order(snapshot) -> order id              │
//! │                       • decrement_stock(product_id, quantity)           │
//! │                              │                                          │
//! │                              ├──► Database (production)                 │
//! │                              │      tienda-db: SQLite repositories,     │
//! │                              │      guarded conditional decrement       │
//! │                              │                                          │
//! │                              └──► FakeStore (tests)                     │
//! │                                     in-memory, scripted failures        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline never branches on *what kind* of store failure happened:
//! an order write failure always surfaces as the same general form message
//! and a stock decrement failure is always logged and swallowed. That is
//! why [`PersistenceError`] is a plain message carrier instead of an enum.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use tienda_core::OrderSnapshot;
use tienda_db::{Database, DbError};

// =============================================================================
// Persistence Error
// =============================================================================

/// A store operation failed.
///
/// Carries the underlying error text for the logs; the buyer only ever
/// sees the fixed Spanish form messages from `tienda-core`.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PersistenceError(pub String);

impl From<DbError> for PersistenceError {
    fn from(err: DbError) -> Self {
        PersistenceError(err.to_string())
    }
}

// =============================================================================
// Order Store Trait
// =============================================================================

/// The two remote operations checkout needs.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the snapshot as a new order and returns its generated id,
    /// the number the confirmation view shows to the buyer.
    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String, PersistenceError>;

    /// Decrements a product's stock by `quantity`, atomically and only
    /// when enough stock remains. Stock never goes negative.
    async fn decrement_stock(&self, product_id: i64, quantity: i64)
        -> Result<(), PersistenceError>;
}

/// Shared handles forward to the inner store, so a test can keep one
/// handle on a fake while the controller owns another.
#[async_trait]
impl<S: OrderStore + ?Sized> OrderStore for Arc<S> {
    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String, PersistenceError> {
        (**self).create_order(snapshot).await
    }

    async fn decrement_stock(
        &self,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), PersistenceError> {
        (**self).decrement_stock(product_id, quantity).await
    }
}

// =============================================================================
// Production Implementation
// =============================================================================

/// The production store: orders and stock live in the SQLite database.
#[async_trait]
impl OrderStore for Database {
    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String, PersistenceError> {
        let order_id = self.orders().insert_order(snapshot).await?;
        Ok(order_id)
    }

    async fn decrement_stock(
        &self,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), PersistenceError> {
        self.products().decrement_stock(product_id, quantity).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tienda_core::{Buyer, CartLine, Product};
    use tienda_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("Failed to create in-memory database")
    }

    fn sample_buyer() -> Buyer {
        Buyer {
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            telefono: "5551234567".to_string(),
            email: "ana@mail.com".to_string(),
        }
    }

    fn catalog_product(title: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: 0,
            title: title.to_string(),
            description: None,
            price_cents,
            stock,
            category: Some("electronics".to_string()),
            picture_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_database_store_round_trip() {
        let db = test_db().await;
        let product_id = db
            .products()
            .insert(&catalog_product("Teclado", 1000, 10))
            .await
            .unwrap();

        let lines = vec![CartLine {
            product_id,
            title: "Teclado".to_string(),
            unit_price_cents: 1000,
            quantity: 2,
        }];
        let snapshot = OrderSnapshot::from_lines(sample_buyer(), &lines, Utc::now());

        let store: &dyn OrderStore = &db;
        let order_id = store.create_order(&snapshot).await.unwrap();
        assert!(!order_id.is_empty());
        assert!(db.orders().get_by_id(&order_id).await.unwrap().is_some());

        store.decrement_stock(product_id, 2).await.unwrap();
        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 8);
    }

    #[tokio::test]
    async fn test_database_store_surfaces_decrement_refusals() {
        let db = test_db().await;
        let product_id = db
            .products()
            .insert(&catalog_product("Mouse", 500, 1))
            .await
            .unwrap();

        let err = db.decrement_stock(product_id, 3).await.unwrap_err();
        assert!(err.to_string().contains("Insufficient stock"));

        let err = db.decrement_stock(9999, 1).await.unwrap_err();
        assert!(err.to_string().contains("not found"));

        // The refusal left the real stock alone
        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 1);
    }

    #[test]
    fn test_persistence_error_keeps_db_message() {
        let err = PersistenceError::from(DbError::PoolExhausted);
        assert_eq!(err.to_string(), "Connection pool exhausted");
    }
}
