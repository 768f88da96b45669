//! # tienda-core: Pure Business Logic for the Tienda Storefront
//!
//! This crate is the **heart** of the storefront. It contains all business
//! logic as pure functions with zero I/O dependencies.
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
//! │  │                 tienda-checkout (orchestration)                 │   │
//! │  │    CartStore, OrderSubmitter, CheckoutController               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tienda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   form    │  │   │
//! │  │   │   Order   │  │   cents   │  │ CartLine  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tienda-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Buyer, OrderSnapshot, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart lines, quantity rules, derived totals
//! - [`error`] - Domain error types and the form error map
//! - [`validation`] - Checkout form rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tienda_core::{Cart, Product};
//!
//! let product = Product {
//!     id: 1,
//!     title: "Mate Imperial".to_string(),
//!     description: None,
//!     price_cents: 1099, // $10.99 - never floats!
//!     stock: 10,
//!     category: None,
//!     picture_url: None,
//!     created_at: Utc::now(),
//!     updated_at: Utc::now(),
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&product, 2).unwrap();
//!
//! assert_eq!(cart.total_cents(), 2198);
//! assert_eq!(format!("{}", cart.total()), "$21.98");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tienda_core::Cart` instead of
// `use tienda_core::cart::Cart`

pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CheckoutField, CoreError, CoreResult, FieldError, ValidationErrors};
pub use money::Money;
pub use types::*;
pub use validation::validate_checkout_form;
