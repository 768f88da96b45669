//! # Cart Store
//!
//! The live, shared cart: `tienda-core`'s pure [`Cart`] behind a mutex,
//! with a watch channel so the UI hears about every effective change.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Observable Cart State                             │
//! │                                                                         │
//! │  Product page ──► add_item() ──────────┐                                │
//! │  Cart page ─────► update_quantity() ───┤                                │
//! │                   remove_item()        ├──► Mutex<Cart>                 │
//! │  Submitter ─────► lines() / clear() ───┘        │                       │
//! │                                                 │ totals changed?       │
//! │                                                 ▼                       │
//! │                                      watch::Sender<CartTotals>          │
//! │                                                 │                       │
//! │  Header badge, cart page totals ◄── subscribe() receivers               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Notification Contract
//! A mutation publishes fresh [`CartTotals`] only when the totals actually
//! changed: removing an absent id, clearing an empty cart or a rejected
//! quantity never wake the receivers. Receivers that only render the badge
//! therefore re-render exactly when the badge content moves.
//!
//! There is one cart per session, owned by whoever builds the controller
//! and passed around explicitly. No globals.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::debug;

use tienda_core::{Cart, CartLine, CartTotals, CoreResult, Money, Product};

/// Thread-safe cart with change notification.
pub struct CartStore {
    cart: Mutex<Cart>,
    totals_tx: watch::Sender<CartTotals>,
}

impl CartStore {
    /// Creates an empty cart store. Subscribers see `CartTotals::default()`
    /// until the first effective mutation.
    pub fn new() -> Self {
        let (totals_tx, _) = watch::channel(CartTotals::default());
        CartStore {
            cart: Mutex::new(Cart::new()),
            totals_tx,
        }
    }

    fn cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().expect("Cart mutex poisoned")
    }

    /// Publishes fresh totals iff they differ from the last published ones.
    fn publish(&self, cart: &Cart) {
        let fresh = CartTotals::from(cart);
        self.totals_tx.send_if_modified(|current| {
            if *current == fresh {
                false
            } else {
                *current = fresh;
                true
            }
        });
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the cart (or merges into its existing line).
    ///
    /// ## Behavior
    /// - Quantity must be ≥ 1, otherwise `CoreError::InvalidQuantity` and
    ///   nothing is published.
    pub fn add_item(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        let mut cart = self.cart();
        cart.add_item(product, quantity)?;
        debug!(product_id = product.id, quantity, "Added to cart");
        self.publish(&cart);
        Ok(())
    }

    /// Sets a line's quantity; 0 removes the line, negatives are rejected.
    pub fn update_quantity(&self, product_id: i64, quantity: i64) -> CoreResult<()> {
        let mut cart = self.cart();
        cart.update_quantity(product_id, quantity)?;
        debug!(product_id, quantity, "Updated cart quantity");
        self.publish(&cart);
        Ok(())
    }

    /// Removes a line. Idempotent: absent ids are a silent no-op and do
    /// not wake subscribers.
    pub fn remove_item(&self, product_id: i64) -> bool {
        let mut cart = self.cart();
        let removed = cart.remove_item(product_id);
        if removed {
            debug!(product_id, "Removed from cart");
            self.publish(&cart);
        }
        removed
    }

    /// Empties the cart. Called by the submitter once the order record is
    /// safely persisted, and by nothing else.
    pub fn clear(&self) {
        let mut cart = self.cart();
        cart.clear();
        debug!("Cart cleared");
        self.publish(&cart);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Owned snapshot of the lines in insertion order. This is also what
    /// the submitter freezes into an order snapshot.
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart().lines().to_vec()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart().is_empty()
    }

    /// Cart total in cents. 0 for an empty cart.
    pub fn total_cents(&self) -> i64 {
        self.cart().total_cents()
    }

    /// Cart total as Money.
    pub fn total(&self) -> Money {
        self.cart().total()
    }

    /// Current derived totals, read from the cart itself (not the channel).
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&*self.cart())
    }

    /// Subscribes to totals changes. The receiver starts at the last
    /// published value.
    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals_tx.subscribe()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        CartStore::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
