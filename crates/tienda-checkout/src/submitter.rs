//! # Order Submitter
//!
//! The submission pipeline: validate → snapshot → persist → decrement
//! stock → clear cart, with every step an explicit phase.
//!
//! ## Pipeline Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Submission Pipeline                              │
//! │                                                                         │
//! │  Idle ──► Validating ──► Persisting ──► DecrementingStock ──► Succeeded │
//! │               │               │                 │                       │
//! │          empty cart or   create_order      per-item failure:            │
//! │          field errors      failed          error! log, keep going       │
//! │               ▼               ▼                                         │
//! │             Failed          Failed                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Guarantees
//! - The order record is always persisted before any stock decrement.
//! - Decrements run sequentially in snapshot item order, each awaited
//!   before the next. An interruption mid-loop leaves a clean prefix of
//!   decremented items and a clean suffix of untouched ones.
//! - The cart is cleared once persistence succeeded, no matter how the
//!   decrements went.
//!
//! ## The Decrement Trade-off
//! A failed decrement never fails the submission: the order already
//! exists, so the buyer sees success while the discrepancy goes to the
//! log at `error!` level for the shopkeeper to reconcile. Favoring the
//! buyer experience here is a deliberate product decision, not an
//! accident; the log line is the only trace, so it carries the order id,
//! product id and quantity.

use std::fmt;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use ts_rs::TS;

use tienda_core::{
    validate_checkout_form, CheckoutForm, FieldError, OrderSnapshot, ValidationErrors,
};

use crate::cart_store::CartStore;
use crate::store::OrderStore;

// =============================================================================
// Submission Phase
// =============================================================================

/// Where the pipeline currently is.
///
/// `Failed` is reachable only from `Validating` (empty cart, field
/// errors) and `Persisting` (order write failure). Decrement failures do
/// not reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Persisting,
    DecrementingStock,
    Succeeded,
    Failed,
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Validating => "validating",
            SubmissionPhase::Persisting => "persisting",
            SubmissionPhase::DecrementingStock => "decrementing_stock",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Submission Result
// =============================================================================

/// Terminal result of one submission attempt.
///
/// Serializes untagged into the two JSON shapes the frontend branches on:
///
/// ```json
/// { "orderId": "7b0f..." }
/// { "errors": { "telefono": "El teléfono debe tener 10 dígitos" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum SubmissionResult {
    /// The order was persisted. Decrement failures, if any, are only in
    /// the log.
    Success {
        #[serde(rename = "orderId")]
        order_id: String,
    },

    /// Nothing was persisted; the cart is intact and a retry is safe.
    Failure {
        #[ts(type = "Record<string, string>")]
        errors: ValidationErrors,
    },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    /// The generated order id, for the confirmation view.
    pub fn order_id(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success { order_id } => Some(order_id),
            SubmissionResult::Failure { .. } => None,
        }
    }

    /// The field/general error map, for rendering next to the form.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            SubmissionResult::Success { .. } => None,
            SubmissionResult::Failure { errors } => Some(errors),
        }
    }
}

// =============================================================================
// Order Submitter
// =============================================================================

/// Runs submission attempts against a backing [`OrderStore`].
///
/// One attempt at a time: the controller guards against concurrent
/// submits, so the phase channel always describes a single pipeline run.
pub struct OrderSubmitter<S> {
    store: S,
    phase_tx: watch::Sender<SubmissionPhase>,
}

impl<S: OrderStore> OrderSubmitter<S> {
    pub fn new(store: S) -> Self {
        let (phase_tx, _) = watch::channel(SubmissionPhase::Idle);
        OrderSubmitter { store, phase_tx }
    }

    /// Current pipeline phase.
    pub fn phase(&self) -> SubmissionPhase {
        *self.phase_tx.borrow()
    }

    /// Watches phase transitions as they happen.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase_tx.subscribe()
    }

    fn enter(&self, phase: SubmissionPhase) {
        debug!(phase = %phase, "Submission phase change");
        self.phase_tx.send_replace(phase);
    }

    fn fail(&self, errors: ValidationErrors) -> SubmissionResult {
        self.enter(SubmissionPhase::Failed);
        SubmissionResult::Failure { errors }
    }

    /// Runs one submission attempt.
    ///
    /// ## Behavior
    /// 1. An empty cart fails with the general «El carrito está vacío»
    ///    before any store call.
    /// 2. Form rules run all together; any violations fail the attempt
    ///    with the full error map, again before any store call.
    /// 3. The cart lines and buyer are frozen into an [`OrderSnapshot`]
    ///    with the timestamp fixed now. Later cart mutations do not
    ///    affect this attempt.
    /// 4. The snapshot is persisted; on failure the cart stays intact so
    ///    the buyer can retry.
    /// 5. Stock decrements run per item, sequentially, failures logged
    ///    and swallowed.
    /// 6. The cart is cleared and the order id returned.
    pub async fn submit(&self, cart: &CartStore, form: &CheckoutForm) -> SubmissionResult {
        self.enter(SubmissionPhase::Validating);

        // Freeze the lines once; this is the set the whole attempt uses.
        let lines = cart.lines();
        if lines.is_empty() {
            warn!("Submission rejected: cart is empty");
            return self.fail(ValidationErrors::general(FieldError::EmptyCart));
        }

        let errors = validate_checkout_form(form);
        if !errors.is_empty() {
            debug!(error_count = errors.len(), "Submission rejected: invalid form");
            return self.fail(errors);
        }

        let snapshot = OrderSnapshot::from_lines(form.buyer(), &lines, Utc::now());

        self.enter(SubmissionPhase::Persisting);
        let order_id = match self.store.create_order(&snapshot).await {
            Ok(order_id) => order_id,
            Err(err) => {
                error!(error = %err, "Order persistence failed; cart left intact");
                return self.fail(ValidationErrors::general(FieldError::OrderPersistence));
            }
        };

        self.enter(SubmissionPhase::DecrementingStock);
        for item in &snapshot.items {
            // The order already stands; a refused decrement is a stock
            // discrepancy for the log, not a submission failure.
            if let Err(err) = self.store.decrement_stock(item.product_id, item.quantity).await {
                error!(
                    order_id = %order_id,
                    product_id = item.product_id,
                    quantity = item.quantity,
                    error = %err,
                    "Stock decrement failed"
                );
            }
        }

        cart.clear();

        info!(
            order_id = %order_id,
            item_count = snapshot.items.len(),
            total_cents = snapshot.total_cents,
            "Order submitted"
        );
        self.enter(SubmissionPhase::Succeeded);
        SubmissionResult::Success { order_id }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
