//! # Domain Types
//!
//! Core domain types used throughout the Tienda storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  CheckoutForm   │   │  OrderSnapshot  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  nombre         │   │  buyer          │       │
//! │  │  title          │   │  apellido       │   │  items[]        │       │
//! │  │  price_cents    │   │  telefono       │   │  total_cents    │       │
//! │  │  stock          │   │  email          │   │  created_at     │       │
//! │  └─────────────────┘   │  confirm_email  │   └─────────────────┘       │
//! │                        └─────────────────┘            │                 │
//! │                                 │                     ▼                 │
//! │                                 ▼            ┌─────────────────┐       │
//! │                        ┌─────────────────┐   │     Order       │       │
//! │                        │     Buyer       │   │  ─────────────  │       │
//! │                        │  (validated     │   │  snapshot + id  │       │
//! │                        │   subset)       │   │  as persisted   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An [`OrderSnapshot`] freezes cart lines and buyer data at submission
//! time. Later cart mutation (or a catalog price change) never rewrites an
//! order that was already built — the same reason sale items freeze their
//! unit price in any point-of-sale system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product available to the storefront.
///
/// Read-only from the cart's point of view: the cart copies what it needs
/// (id, title, price) and never writes back. Stock lives here but is only
/// ever mutated by the persistence layer's conditional decrement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: i64,

    /// Display title shown in listings and on the cart.
    pub title: String,

    /// Optional long-form description for the detail page.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Remaining purchasable stock.
    pub stock: i64,

    /// Category slug for catalog navigation.
    pub category: Option<String>,

    /// Image URL for listings.
    pub picture_url: Option<String>,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Buyer
// =============================================================================

/// Buyer contact data as it goes into an order.
///
/// This is the validated subset of [`CheckoutForm`] — the confirmation
/// field has already done its job and is not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub nombre: String,
    pub apellido: String,
    /// 10-digit phone number (validated before this type is built).
    pub telefono: String,
    pub email: String,
}

// =============================================================================
// Checkout Form
// =============================================================================

/// Raw checkout form input, exactly as the presentation layer collects it.
///
/// Values are untrimmed and unvalidated; `validate_checkout_form` decides
/// whether they can become a [`Buyer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
    pub email: String,
    pub confirm_email: String,
}

impl CheckoutForm {
    /// Extracts the buyer record from a form that already passed
    /// validation. Values are carried verbatim — the storefront shows the
    /// buyer exactly what they typed.
    pub fn buyer(&self) -> Buyer {
        Buyer {
            nombre: self.nombre.clone(),
            apellido: self.apellido.clone(),
            telefono: self.telefono.clone(),
            email: self.email.clone(),
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item inside an order, frozen at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Catalog product this line refers to.
    pub product_id: i64,
    /// Product title at time of submission (frozen).
    pub title: String,
    /// Unit price in cents at time of submission (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered.
    pub quantity: i64,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total before any adjustment (unit_price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        OrderItem {
            product_id: line.product_id,
            title: line.title.clone(),
            unit_price_cents: line.unit_price_cents,
            quantity: line.quantity,
        }
    }
}

// =============================================================================
// Order Snapshot
// =============================================================================

/// Everything an order contains, frozen at the moment of submission.
///
/// Write-once by construction: built in one call, never mutated. The cart
/// can change or be cleared afterwards without affecting a snapshot that
/// was already taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub buyer: Buyer,
    pub items: Vec<OrderItem>,
    /// Σ unit_price_cents × quantity over `items`.
    pub total_cents: i64,
    /// Submission timestamp, fixed by the caller when the snapshot is taken.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderSnapshot {
    /// Freezes cart lines and buyer data into a snapshot.
    ///
    /// The total is computed here from the frozen lines, so it always
    /// agrees with `items` regardless of what the live cart does next.
    pub fn from_lines(buyer: Buyer, lines: &[CartLine], created_at: DateTime<Utc>) -> Self {
        let items: Vec<OrderItem> = lines.iter().map(OrderItem::from).collect();
        let total_cents = items.iter().map(|item| item.line_total_cents()).sum();

        OrderSnapshot {
            buyer,
            items,
            total_cents,
            created_at,
        }
    }

    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Number of distinct lines in the order.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order: snapshot data plus the identifier the store
/// generated for it. This is what the confirmation view reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-generated identifier (UUID v4), shown to the buyer.
    pub id: String,
    pub buyer: Buyer,
    pub items: Vec<OrderItem>,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_buyer() -> Buyer {
        Buyer {
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            telefono: "5551234567".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn line(product_id: i64, unit_price_cents: i64, quantity: i64) -> CartLine {
        CartLine {
            product_id,
            title: format!("Producto {product_id}"),
            unit_price_cents,
            quantity,
        }
    }

    #[test]
    fn test_checkout_form_buyer_carries_raw_values() {
        let form = CheckoutForm {
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            telefono: "5551234567".to_string(),
            email: "ana@example.com".to_string(),
            confirm_email: "ana@example.com".to_string(),
        };

        let buyer = form.buyer();
        assert_eq!(buyer, test_buyer());
    }

    #[test]
    fn test_order_item_from_cart_line() {
        let item = OrderItem::from(&line(7, 1099, 3));
        assert_eq!(item.product_id, 7);
        assert_eq!(item.unit_price_cents, 1099);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.line_total_cents(), 3297);
        assert_eq!(item.unit_price(), Money::from_cents(1099));
    }

    #[test]
    fn test_snapshot_total_matches_items() {
        let lines = vec![line(1, 1000, 2), line(2, 500, 3)];
        let snapshot = OrderSnapshot::from_lines(test_buyer(), &lines, Utc::now());

        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(snapshot.total_cents, 3500);
        assert_eq!(snapshot.total(), Money::from_cents(3500));
    }

    #[test]
    fn test_snapshot_is_independent_of_source_lines() {
        let mut lines = vec![line(1, 1000, 2)];
        let snapshot = OrderSnapshot::from_lines(test_buyer(), &lines, Utc::now());

        // Mutating the source after the fact changes nothing in the snapshot
        lines[0].quantity = 99;
        assert_eq!(snapshot.items[0].quantity, 2);
        assert_eq!(snapshot.total_cents, 2000);
    }

    #[test]
    fn test_serde_uses_camel_case_keys() {
        let form = CheckoutForm {
            confirm_email: "a@b.com".to_string(),
            ..CheckoutForm::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("confirmEmail").is_some());
        assert!(json.get("confirm_email").is_none());

        let snapshot = OrderSnapshot::from_lines(test_buyer(), &[line(1, 250, 1)], Utc::now());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalCents"], 250);
        assert_eq!(json["items"][0]["productId"], 1);
        assert_eq!(json["items"][0]["unitPriceCents"], 250);
    }
}
