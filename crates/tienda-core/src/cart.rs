//! # Cart
//!
//! Pure cart state: lines, quantity bookkeeping, derived totals.
//!
//! No I/O and no notification here — this is the math. The observable,
//! thread-safe wrapper around it lives in `tienda-checkout::CartStore`.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action         Operation              Cart Change           │
//! │  ─────────────────         ─────────              ───────────           │
//! │                                                                         │
//! │  "Agregar al carrito" ───► add_item() ──────────► merge or push line   │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ───► line.quantity = n    │
//! │                            (n == 0 removes)                             │
//! │                                                                         │
//! │  Click remove ───────────► remove_item() ───────► retain others        │
//! │                                                                         │
//! │  Order persisted ────────► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  Render cart ────────────► lines() / total() ───► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! A cart is created empty at session start and lives only in memory:
//! closing the session loses it. That is a design choice, not a defect —
//! there is no cart persistence anywhere in the system.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart.
///
/// ## Design Notes
/// - `product_id` references the catalog product (for the stock decrement
///   at checkout).
/// - `title` and `unit_price_cents` are frozen copies taken when the line
///   was first added. A catalog edit mid-session never reprices a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog product id.
    pub product_id: i64,

    /// Product title at time of adding (frozen).
    pub title: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart. Always ≥ 1 while the line exists.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a product, freezing title and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id,
            title: product.title.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges
///   quantities into the existing line).
/// - Quantity is always ≥ 1 while a line exists; an update to 0 removes
///   the line, negative quantities are rejected.
/// - `total_cents()` always equals Σ unit_price_cents × quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Quantity must be ≥ 1, otherwise `CoreError::InvalidQuantity`.
    /// - If the product is already in the cart, its line keeps the title
    ///   and price frozen at first add and only the quantity grows.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(CoreError::InvalidQuantity { quantity });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity += quantity;
            return Ok(());
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - Quantity 0 removes the line (no error if it was already gone —
    ///   same contract as `remove_item`).
    /// - Negative quantity is `CoreError::InvalidQuantity`.
    /// - Positive quantity for a product that is not in the cart is
    ///   `CoreError::LineNotFound`.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity < 0 {
            return Err(CoreError::InvalidQuantity { quantity });
        }

        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound { product_id }),
        }
    }

    /// Removes a line by product id.
    ///
    /// Idempotent: removing an absent id is a no-op. Returns whether a
    /// line was actually removed, so callers can skip notifications for
    /// no-ops.
    pub fn remove_item(&mut self, product_id: i64) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != initial_len
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of unique lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Calculates the cart total in cents. 0 for an empty cart.
    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(|line| line.line_total_cents()).sum()
    }

    /// Returns the cart total as Money.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived totals summary, what the header badge and cart page render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total_cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: i64, price_cents: i64) -> Product {
        Product {
            id,
            title: format!("Producto {}", id),
            description: None,
            price_cents,
            stock: 25,
            category: None,
            picture_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let product = test_product(1, 999); // $9.99

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total_cents(), 1998); // $19.98
    }

    #[test]
    fn test_add_same_product_merges_lines() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1); // Still one unique line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_merged_line_keeps_frozen_price() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 1).unwrap();

        // Same product comes back from the catalog with a new price:
        // the existing line keeps the price frozen at first add.
        cart.add_item(&test_product(1, 1500), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].unit_price_cents, 1000);
        assert_eq!(cart.total_cents(), 3000);
    }

    #[test]
    fn test_add_item_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        let err = cart.add_item(&product, 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: 0 }));

        let err = cart.add_item(&product, -2).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: -2 }));

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 500), 2).unwrap();

        cart.update_quantity(1, 7).unwrap();
        assert_eq!(cart.total_quantity(), 7);
        assert_eq!(cart.total_cents(), 3500);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 500), 2).unwrap();

        cart.update_quantity(1, 0).unwrap();
        assert!(cart.is_empty());

        // Zero on an absent id behaves like remove_item: a silent no-op
        cart.update_quantity(1, 0).unwrap();
    }

    #[test]
    fn test_update_quantity_rejects_negative() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 500), 2).unwrap();

        let err = cart.update_quantity(1, -1).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: -1 }));
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_update_quantity_unknown_product() {
        let mut cart = Cart::new();

        let err = cart.update_quantity(9, 3).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { product_id: 9 }));
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 500), 2).unwrap();

        assert!(cart.remove_item(1));
        assert!(cart.is_empty());

        // Second removal of the same id is a no-op, not an error
        assert!(!cart.remove_item(1));
        assert!(!cart.remove_item(42));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 999), 2).unwrap();
        cart.add_item(&test_product(2, 450), 1).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_cents(), 0);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total_cents(), 0);
        assert_eq!(cart.total(), Money::zero());
    }

    /// Runs a mixed operation sequence and checks the standing invariants:
    /// the total always equals the sum over current lines and no line ever
    /// holds a quantity ≤ 0.
    #[test]
    fn test_total_matches_lines_after_mixed_operations() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 2).unwrap();
        cart.add_item(&test_product(2, 500), 3).unwrap();
        cart.add_item(&test_product(1, 1000), 1).unwrap();
        cart.update_quantity(2, 1).unwrap();
        cart.remove_item(3); // absent, no-op
        cart.add_item(&test_product(3, 250), 4).unwrap();
        cart.update_quantity(1, 0).unwrap(); // removes line 1

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|line| line.unit_price_cents * line.quantity)
            .sum();
        assert_eq!(cart.total_cents(), expected);
        assert_eq!(cart.total_cents(), 500 + 1000); // line 2: 500×1, line 3: 250×4
        assert!(cart.lines().iter().all(|line| line.quantity >= 1));
    }

    #[test]
    fn test_cart_totals_summary() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 2).unwrap();
        cart.add_item(&test_product(2, 500), 3).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.total_cents, 3500);

        let empty = CartTotals::default();
        assert_eq!(empty.total_cents, 0);
    }
}
