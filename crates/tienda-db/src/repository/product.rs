//! # Product Repository
//!
//! Database operations for the product catalog ("productos").
//!
//! ## Key Operations
//! - Catalog listing (all products or by category)
//! - Lookup by id for detail views
//! - Guarded stock decrements at checkout
//!
//! ## Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How decrement_stock Stays Non-Negative                  │
//! │                                                                         │
//! │  Checkout wants 3 units of product 7                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE productos SET stock = stock - 3                                │
//! │  WHERE id = 7 AND stock >= 3        ← condition and write are ONE      │
//! │       │                               atomic statement                  │
//! │       ├── rows_affected = 1 → decrement applied                        │
//! │       │                                                                 │
//! │       └── rows_affected = 0 → re-read stock:                           │
//! │              Some(n) → InsufficientStock { available: n }              │
//! │              None    → NotFound                                        │
//! │                                                                         │
//! │  Two checkouts racing for the last unit: exactly one UPDATE wins.      │
//! │  A read-then-write pair could drive stock negative; this cannot.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tienda_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // List the catalog
/// let products = repo.list(50).await?;
///
/// // Get by ID
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products for the storefront, sorted by title.
    ///
    /// ## Arguments
    /// * `limit` - Maximum results to return
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        debug!(limit = %limit, "Listing products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents, stock,
                category, picture_url, created_at, updated_at
            FROM productos
            ORDER BY title
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products in a category, sorted by title.
    ///
    /// ## Arguments
    /// * `category` - Category name as stored (e.g. "electronics", "jewelery")
    /// * `limit` - Maximum results to return
    pub async fn list_by_category(&self, category: &str, limit: u32) -> DbResult<Vec<Product>> {
        debug!(category = %category, limit = %limit, "Listing products by category");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents, stock,
                category, picture_url, created_at, updated_at
            FROM productos
            WHERE category = ?1
            ORDER BY title
            LIMIT ?2
            "#,
        )
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, title, description, price_cents, stock,
                category, picture_url, created_at, updated_at
            FROM productos
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns its assigned id.
    ///
    /// ## Arguments
    /// * `product` - Product to insert. `product.id` is ignored; SQLite
    ///   assigns the row id.
    pub async fn insert(&self, product: &Product) -> DbResult<i64> {
        debug!(title = %product.title, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO productos (
                title, description, price_cents, stock,
                category, picture_url, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8
            )
            "#,
        )
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.picture_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Decrements stock for a purchased product, refusing to go negative.
    ///
    /// ## Behavior
    /// The condition and the write are a single UPDATE statement:
    ///
    /// ```sql
    /// UPDATE productos SET stock = stock - ?
    /// WHERE id = ? AND stock >= ?
    /// ```
    ///
    /// When no row matches, the stock is re-read once to report the right
    /// error.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `quantity` - Units sold (the cart line quantity, always >= 1)
    ///
    /// ## Returns
    /// * `Ok(())` - Stock decremented
    /// * `Err(DbError::InsufficientStock)` - Fewer than `quantity` units left
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn decrement_stock(&self, id: i64, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE productos
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Missing product or short stock; re-read to tell them apart
            let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM productos WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            return match stock {
                Some(available) => Err(DbError::InsufficientStock {
                    product_id: id,
                    available,
                    requested: quantity,
                }),
                None => Err(DbError::not_found("Product", id.to_string())),
            };
        }

        Ok(())
    }

    /// Counts total products (for diagnostics and seed checks).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM productos")
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
    use chrono::Utc;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_product(title: &str, price_cents: i64, stock: i64, category: &str) -> Product {
        let now = Utc::now();
        Product {
            id: 0, // assigned by the database
            title: title.to_string(),
            description: Some(format!("{title} description")),
            price_cents,
            stock,
            category: Some(category.to_string()),
            picture_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;
        let repo = db.products();

        let id = repo
            .insert(&sample_product("Anillo de plata", 4500, 10, "jewelery"))
            .await
            .unwrap();

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.title, "Anillo de plata");
        assert_eq!(found.price_cents, 4500);
        assert_eq!(found.stock, 10);
        assert_eq!(found.category.as_deref(), Some("jewelery"));
    }

    #[tokio::test]
    async fn test_get_by_id_missing_returns_none() {
        let db = test_db().await;
        let repo = db.products();

        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_title() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample_product("Monitor", 19999, 5, "electronics"))
            .await
            .unwrap();
        repo.insert(&sample_product("Auriculares", 9999, 5, "electronics"))
            .await
            .unwrap();

        let products = repo.list(10).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Auriculares");
        assert_eq!(products[1].title, "Monitor");
    }

    #[tokio::test]
    async fn test_list_by_category_filters() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample_product("Collar de oro", 120000, 3, "jewelery"))
            .await
            .unwrap();
        repo.insert(&sample_product("Teclado", 5999, 8, "electronics"))
            .await
            .unwrap();

        let jewelery = repo.list_by_category("jewelery", 10).await.unwrap();
        assert_eq!(jewelery.len(), 1);
        assert_eq!(jewelery[0].title, "Collar de oro");

        let empty = repo.list_by_category("books", 10).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_decrement_stock() {
        let db = test_db().await;
        let repo = db.products();

        let id = repo
            .insert(&sample_product("Mouse", 2999, 5, "electronics"))
            .await
            .unwrap();

        repo.decrement_stock(id, 2).await.unwrap();

        let product = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_decrement_stock_to_zero() {
        let db = test_db().await;
        let repo = db.products();

        let id = repo
            .insert(&sample_product("Pulsera", 1500, 2, "jewelery"))
            .await
            .unwrap();

        repo.decrement_stock(id, 2).await.unwrap();

        let product = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_decrement_stock_insufficient() {
        let db = test_db().await;
        let repo = db.products();

        let id = repo
            .insert(&sample_product("Webcam", 4999, 1, "electronics"))
            .await
            .unwrap();

        let err = repo.decrement_stock(id, 2).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, id);
                assert_eq!(available, 1);
                assert_eq!(requested, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Stock untouched after the refused decrement
        let product = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 1);
    }

    #[tokio::test]
    async fn test_decrement_stock_missing_product() {
        let db = test_db().await;
        let repo = db.products();

        let err = repo.decrement_stock(424242, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_count() {
        let db = test_db().await;
        let repo = db.products();

        assert_eq!(repo.count().await.unwrap(), 0);

        repo.insert(&sample_product("Parlante", 7999, 4, "electronics"))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
