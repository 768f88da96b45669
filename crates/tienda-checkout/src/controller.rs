//! # Checkout Controller
//!
//! The UI-facing checkout lifecycle: one submission at a time, the last
//! result kept for rendering, a watch channel for the form to follow.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Lifecycle                               │
//! │                                                                         │
//! │             submit()                    result                          │
//! │   Idle ───────────────► Submitting ────────────┬──► Succeeded           │
//! │    ▲                        │                  └──► Failed              │
//! │    │                        │ submit() again while in flight:           │
//! │    │                        │ ignored, returns None                     │
//! │    │                        │                                           │
//! │    └───── reset() ◄─────────┴──── (from Succeeded / Failed only)        │
//! │                                                                         │
//! │   While Submitting the form shows «Procesando...»; on Succeeded the     │
//! │   confirmation view renders confirmed_order_id(); on Failed errors()    │
//! │   lands next to the fields.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller owns the cart handle and the submitter; the presentation
//! layer holds the controller in shared state and calls into it from event
//! handlers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use ts_rs::TS;

use tienda_core::{CheckoutForm, ValidationErrors};

use crate::cart_store::CartStore;
use crate::store::OrderStore;
use crate::submitter::{OrderSubmitter, SubmissionResult};

// =============================================================================
// Checkout Phase
// =============================================================================

/// The coarse lifecycle the form UI binds to.
///
/// This is deliberately coarser than [`crate::SubmissionPhase`]: the form
/// only needs to know whether to disable the button («Procesando...»),
/// show errors, or switch to the confirmation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Succeeded => "succeeded",
            CheckoutPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Checkout Controller
// =============================================================================

/// Owns the submission lifecycle for one checkout form.
pub struct CheckoutController<S> {
    cart: Arc<CartStore>,
    submitter: OrderSubmitter<S>,
    phase_tx: watch::Sender<CheckoutPhase>,
    last_result: Mutex<Option<SubmissionResult>>,
}

impl<S: OrderStore> CheckoutController<S> {
    pub fn new(cart: Arc<CartStore>, store: S) -> Self {
        let (phase_tx, _) = watch::channel(CheckoutPhase::Idle);
        CheckoutController {
            cart,
            submitter: OrderSubmitter::new(store),
            phase_tx,
            last_result: Mutex::new(None),
        }
    }

    fn result_slot(&self) -> MutexGuard<'_, Option<SubmissionResult>> {
        self.last_result.lock().expect("Result mutex poisoned")
    }

    /// Runs one submission, unless one is already in flight.
    ///
    /// ## Returns
    /// - `Some(result)` once the attempt finishes.
    /// - `None` when a submission was already in flight: the duplicate is
    ///   ignored outright, never queued, and the store is not touched.
    pub async fn submit(&self, form: &CheckoutForm) -> Option<SubmissionResult> {
        // Claim the in-flight slot atomically on the phase channel
        let claimed = self.phase_tx.send_if_modified(|phase| {
            if *phase == CheckoutPhase::Submitting {
                false
            } else {
                *phase = CheckoutPhase::Submitting;
                true
            }
        });
        if !claimed {
            debug!("Submission already in flight; duplicate submit ignored");
            return None;
        }

        let result = self.submitter.submit(&self.cart, form).await;

        // The result lands before the terminal phase is published, so a
        // watcher that wakes on Succeeded can read the order id right away
        *self.result_slot() = Some(result.clone());
        let terminal = if result.is_success() {
            CheckoutPhase::Succeeded
        } else {
            CheckoutPhase::Failed
        };
        self.phase_tx.send_replace(terminal);

        Some(result)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> CheckoutPhase {
        *self.phase_tx.borrow()
    }

    /// True while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.phase() == CheckoutPhase::Submitting
    }

    /// Watches lifecycle changes, for the form to re-render on.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutPhase> {
        self.phase_tx.subscribe()
    }

    /// Result of the last finished attempt, if any.
    pub fn last_result(&self) -> Option<SubmissionResult> {
        self.result_slot().clone()
    }

    /// Error map of the last attempt, for rendering next to the fields.
    /// `None` after a success or before any attempt.
    pub fn errors(&self) -> Option<ValidationErrors> {
        match &*self.result_slot() {
            Some(SubmissionResult::Failure { errors }) => Some(errors.clone()),
            _ => None,
        }
    }

    /// Order id of the last successful attempt, what the confirmation
    /// view shows under «¡Orden completada!».
    pub fn confirmed_order_id(&self) -> Option<String> {
        match &*self.result_slot() {
            Some(SubmissionResult::Success { order_id }) => Some(order_id.clone()),
            _ => None,
        }
    }

    /// Returns to `Idle` and forgets the last result — the «Volver a la
    /// tienda» action on the confirmation view.
    ///
    /// Ignored while a submission is in flight; there is no abort path
    /// once a submission begins.
    pub fn reset(&self) {
        let mut reset = false;
        self.phase_tx.send_if_modified(|phase| {
            if *phase == CheckoutPhase::Submitting {
                return false;
            }
            reset = true;
            let changed = *phase != CheckoutPhase::Idle;
            *phase = CheckoutPhase::Idle;
            changed
        });

        if reset {
            *self.result_slot() = None;
            debug!("Checkout reset to idle");
        } else {
            debug!("Reset ignored: submission in flight");
        }
    }

    /// Shared handle to the cart this controller submits from.
    pub fn cart(&self) -> Arc<CartStore> {
        Arc::clone(&self.cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
