//! # Order Repository
//!
//! Database operations for orders and order items.
//!
//! ## Order Persistence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Persistence                                 │
//! │                                                                         │
//! │  1. SNAPSHOT ARRIVES                                                   │
//! │     └── OrderSnapshot { buyer, items, total_cents, created_at }        │
//! │         (frozen by the checkout pipeline, never mutated here)          │
//! │                                                                         │
//! │  2. INSERT (one transaction)                                           │
//! │     └── INSERT INTO orders       → buyer columns + total               │
//! │     └── INSERT INTO order_items  → one row per line, position kept     │
//! │     └── COMMIT → order id returned to the caller                       │
//! │                                                                         │
//! │  3. CONFIRMATION READS                                                 │
//! │     └── get_by_id() → Order with items in cart order                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tienda_core::{Buyer, Order, OrderItem, OrderSnapshot};

/// Flat row shape for the `orders` table.
///
/// [`Order`] nests a [`Buyer`], which `FromRow` can't map directly,
/// so queries decode into this row first.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    nombre: String,
    apellido: String,
    telefono: String,
    email: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            buyer: Buyer {
                nombre: self.nombre,
                apellido: self.apellido,
                telefono: self.telefono,
                email: self.email,
            },
            items,
            total_cents: self.total_cents,
            created_at: self.created_at,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order snapshot and returns the generated order id.
    ///
    /// ## Snapshot Pattern
    /// Buyer contact data and per-line title/price are written as-is from
    /// the snapshot. Later catalog edits never rewrite order history.
    ///
    /// ## Transactionality
    /// The order row and all item rows commit together. A failure at any
    /// point rolls the whole order back; there is no half-written order
    /// for the confirmation view to find.
    ///
    /// ## Returns
    /// The generated order id (UUID v4).
    pub async fn insert_order(&self, snapshot: &OrderSnapshot) -> DbResult<String> {
        let order_id = Uuid::new_v4().to_string();

        debug!(
            id = %order_id,
            items = snapshot.items.len(),
            total_cents = snapshot.total_cents,
            "Inserting order"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, nombre, apellido, telefono, email,
                total_cents, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7
            )
            "#,
        )
        .bind(&order_id)
        .bind(&snapshot.buyer.nombre)
        .bind(&snapshot.buyer.apellido)
        .bind(&snapshot.buyer.telefono)
        .bind(&snapshot.buyer.email)
        .bind(snapshot.total_cents)
        .bind(snapshot.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in snapshot.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, title,
                    unit_price_cents, quantity, line_total_cents, position
                ) VALUES (
                    ?1, ?2, ?3, ?4,
                    ?5, ?6, ?7, ?8
                )
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(item.product_id)
            .bind(&item.title)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents())
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(order_id)
    }

    /// Gets an order by ID, items included.
    ///
    /// ## Returns
    /// * `Ok(Some(Order))` - Order found, items in cart order
    /// * `Ok(None)` - No order with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT
                id, nombre, apellido, telefono, email,
                total_cents, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.get_items(id).await?;
                Ok(Some(row.into_order(items)))
            }
            None => Ok(None),
        }
    }

    /// Gets all items for an order, in the order the cart held them.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT
                product_id, title, unit_price_cents, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts total orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_buyer() -> Buyer {
        Buyer {
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            telefono: "5551234567".to_string(),
            email: "ana@mail.com".to_string(),
        }
    }

    fn sample_snapshot() -> OrderSnapshot {
        OrderSnapshot {
            buyer: sample_buyer(),
            items: vec![
                OrderItem {
                    product_id: 1,
                    title: "Teclado".to_string(),
                    unit_price_cents: 1000,
                    quantity: 2,
                },
                OrderItem {
                    product_id: 2,
                    title: "Mouse".to_string(),
                    unit_price_cents: 500,
                    quantity: 3,
                },
            ],
            total_cents: 3500,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_order_returns_uuid() {
        let db = test_db().await;
        let repo = db.orders();

        let id = repo.insert_order(&sample_snapshot()).await.unwrap();
        assert!(!id.is_empty());

        // Two orders never share an id
        let second = repo.insert_order(&sample_snapshot()).await.unwrap();
        assert_ne!(id, second);
    }

    #[tokio::test]
    async fn test_get_by_id_round_trip() {
        let db = test_db().await;
        let repo = db.orders();

        let id = repo.insert_order(&sample_snapshot()).await.unwrap();
        let order = repo.get_by_id(&id).await.unwrap().unwrap();

        assert_eq!(order.id, id);
        assert_eq!(order.buyer.nombre, "Ana");
        assert_eq!(order.buyer.apellido, "García");
        assert_eq!(order.buyer.telefono, "5551234567");
        assert_eq!(order.buyer.email, "ana@mail.com");
        assert_eq!(order.total_cents, 3500);

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].title, "Teclado");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[1].title, "Mouse");
        assert_eq!(order.items[1].quantity, 3);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_returns_none() {
        let db = test_db().await;
        let repo = db.orders();

        let missing = repo.get_by_id("no-such-order").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_items_keep_cart_order() {
        let db = test_db().await;
        let repo = db.orders();

        // Titles deliberately out of alphabetical order
        let snapshot = OrderSnapshot {
            buyer: sample_buyer(),
            items: vec![
                OrderItem {
                    product_id: 9,
                    title: "Zapatillas".to_string(),
                    unit_price_cents: 15000,
                    quantity: 1,
                },
                OrderItem {
                    product_id: 3,
                    title: "Anillo".to_string(),
                    unit_price_cents: 4500,
                    quantity: 1,
                },
                OrderItem {
                    product_id: 5,
                    title: "Monitor".to_string(),
                    unit_price_cents: 19999,
                    quantity: 1,
                },
            ],
            total_cents: 39499,
            created_at: Utc::now(),
        };

        let id = repo.insert_order(&snapshot).await.unwrap();
        let items = repo.get_items(&id).await.unwrap();

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Zapatillas", "Anillo", "Monitor"]);
    }

    #[tokio::test]
    async fn test_line_totals_persisted_per_item() {
        let db = test_db().await;
        let repo = db.orders();

        let id = repo.insert_order(&sample_snapshot()).await.unwrap();

        // 1000 * 2 and 500 * 3, straight from the snapshot lines
        let totals: Vec<i64> = sqlx::query_scalar(
            "SELECT line_total_cents FROM order_items WHERE order_id = ?1 ORDER BY position",
        )
        .bind(&id)
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(totals, vec![2000, 1500]);
    }

    #[tokio::test]
    async fn test_count() {
        let db = test_db().await;
        let repo = db.orders();

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.insert_order(&sample_snapshot()).await.unwrap();
        repo.insert_order(&sample_snapshot()).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
