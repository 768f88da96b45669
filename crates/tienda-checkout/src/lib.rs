//! # tienda-checkout: Checkout Orchestration for the Tienda Storefront
//!
//! This crate connects the pure logic in `tienda-core` to the persistence
//! layer in `tienda-db`: it owns the live cart, runs the submission
//! pipeline, and exposes the lifecycle the checkout form renders from.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tienda Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout Form ──► Confirmation   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tienda-checkout (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐   ┌─────────────────┐   ┌──────────────────┐  │   │
//! │  │   │ CartStore  │◄──│ OrderSubmitter  │◄──│CheckoutController│  │   │
//! │  │   │ lines +    │   │ validate ►      │   │ one submit at a  │  │   │
//! │  │   │ totals     │   │ persist ►       │   │ time, last       │  │   │
//! │  │   │ watchers   │   │ decrement ►     │   │ result, phases   │  │   │
//! │  │   └────────────┘   │ clear           │   └──────────────────┘  │   │
//! │  │                    └────────┬────────┘                          │   │
//! │  │                             │ trait OrderStore                  │   │
//! │  └─────────────────────────────┼──────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tienda-db (Database Layer)                   │   │
//! │  │         orders insert (transaction), guarded stock decrement    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart_store`] - Live cart state with change notification
//! - [`submitter`] - The submission pipeline and its typed results
//! - [`controller`] - UI-facing lifecycle, duplicate-submit guard
//! - [`store`] - The `OrderStore` persistence seam
//! - [`fake_store`] - Scripted in-memory store for tests
//!
//! ## Key Decisions
//!
//! 1. **One cart per session, owned explicitly**: the cart is built by the
//!    session and handed to the controller. No globals, no singletons.
//! 2. **Persist first, decrement after**: the order record always lands
//!    before any stock decrement is attempted.
//! 3. **Decrement failures never fail the buyer**: they are logged at
//!    `error!` and swallowed; the confirmation still renders.
//! 4. **Duplicate submits are ignored**: a second submit while one is in
//!    flight returns `None` and never reaches the store.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use tienda_checkout::{CartStore, CheckoutController, FakeStore};
//! use tienda_core::{CheckoutForm, Product};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mate = Product {
//!     id: 1,
//!     title: "Mate Imperial".to_string(),
//!     description: None,
//!     price_cents: 1099,
//!     stock: 10,
//!     category: None,
//!     picture_url: None,
//!     created_at: Utc::now(),
//!     updated_at: Utc::now(),
//! };
//!
//! let cart = Arc::new(CartStore::new());
//! cart.add_item(&mate, 2).unwrap();
//!
//! let controller = CheckoutController::new(Arc::clone(&cart), Arc::new(FakeStore::new()));
//! let form = CheckoutForm {
//!     nombre: "Ana".to_string(),
//!     apellido: "García".to_string(),
//!     telefono: "5551234567".to_string(),
//!     email: "ana@mail.com".to_string(),
//!     confirm_email: "ana@mail.com".to_string(),
//! };
//!
//! let result = controller.submit(&form).await.unwrap();
//! assert!(result.is_success());
//! assert!(cart.is_empty());
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod controller;
pub mod fake_store;
pub mod store;
pub mod submitter;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart_store::CartStore;
pub use controller::{CheckoutController, CheckoutPhase};
pub use fake_store::FakeStore;
pub use store::{OrderStore, PersistenceError};
pub use submitter::{OrderSubmitter, SubmissionPhase, SubmissionResult};
