//! # Repository Module
//!
//! Database repository implementations for Tienda.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout Pipeline                                                     │
//! │       │                                                                 │
//! │       │  db.orders().insert_order(&snapshot)                           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── insert_order(&self, snapshot)                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── get_items(&self, order_id)                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database)                                   │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads and stock decrements
//! - [`order::OrderRepository`] - Order persistence and confirmation reads

pub mod order;
pub mod product;
