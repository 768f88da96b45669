//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tienda-core errors (this file)                                        │
//! │  ├── CoreError         - Cart contract violations                      │
//! │  ├── FieldError        - Per-field checkout form failures              │
//! │  └── ValidationErrors  - field → message map shown next to the form    │
//! │                                                                         │
//! │  tienda-db errors (separate crate)                                     │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  tienda-checkout errors (separate crate)                               │
//! │  └── PersistenceError  - What the submission pipeline sees             │
//! │                                                                         │
//! │  Flow: FieldError → ValidationErrors → SubmissionResult → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, quantity, etc.)
//! 3. Errors are enum variants, never String
//! 4. Form-facing messages are the literal Spanish copy the UI renders
//!
//! ## Language Split
//! `CoreError` messages are developer-facing English (they end up in logs).
//! `FieldError` messages are the buyer-facing Spanish label text; the UI
//! renders them verbatim, so they are part of the contract, not decoration.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Cart contract violations.
///
/// These errors represent misuse of the cart API by the caller, not user
/// input problems. They should never reach the buyer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity argument outside the allowed range.
    ///
    /// ## When This Occurs
    /// - `add_item` called with quantity < 1
    /// - `update_quantity` called with a negative quantity
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// The cart holds no line for the given product.
    ///
    /// ## When This Occurs
    /// - `update_quantity` with a positive quantity for a product that was
    ///   never added (or already removed). Removal itself is idempotent and
    ///   never raises this.
    #[error("Product {product_id} is not in the cart")]
    LineNotFound { product_id: i64 },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Checkout Fields
// =============================================================================

/// The checkout form fields that can carry a validation error.
///
/// `General` is not a form input; it carries form-level failures (empty
/// cart, persistence failure) that render above the fields.
///
/// Variant order is the on-screen field order, which makes iteration over
/// a [`ValidationErrors`] map deterministic and display-ready.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    Nombre,
    Apellido,
    Telefono,
    Email,
    ConfirmEmail,
    General,
}

impl CheckoutField {
    /// The wire key the frontend uses to place the message next to its
    /// input (`confirmEmail`, not `confirm_email`).
    pub const fn key(&self) -> &'static str {
        match self {
            CheckoutField::Nombre => "nombre",
            CheckoutField::Apellido => "apellido",
            CheckoutField::Telefono => "telefono",
            CheckoutField::Email => "email",
            CheckoutField::ConfirmEmail => "confirmEmail",
            CheckoutField::General => "general",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Field Error
// =============================================================================

/// Per-field checkout failures, one variant per rendered message.
///
/// The `#[error]` texts are the exact Spanish strings the storefront shows;
/// changing them changes the UI.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("El nombre es requerido")]
    NameRequired,

    #[error("El apellido es requerido")]
    LastNameRequired,

    #[error("El teléfono es requerido")]
    PhoneRequired,

    #[error("El teléfono debe tener 10 dígitos")]
    PhoneInvalid,

    #[error("El email es requerido")]
    EmailRequired,

    #[error("Email inválido")]
    EmailInvalid,

    #[error("Los emails no coinciden")]
    EmailMismatch,

    /// Submission attempted with nothing in the cart.
    #[error("El carrito está vacío")]
    EmptyCart,

    /// The order record could not be written.
    #[error("Error al procesar la orden")]
    OrderPersistence,
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Accumulated checkout form failures, keyed by field.
///
/// An empty map means the form is valid. Serializes as the flat
/// `{ "field": "message" }` object the form renders from:
///
/// ```json
/// { "nombre": "El nombre es requerido", "confirmEmail": "Los emails no coinciden" }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<CheckoutField, FieldError>,
}

impl ValidationErrors {
    /// Creates an empty error map (a valid form).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding a single form-level error under `general`.
    pub fn general(error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.insert(CheckoutField::General, error);
        errors
    }

    /// Records an error for a field. A second insert for the same field
    /// replaces the first; validators are written so that never happens.
    pub fn insert(&mut self, field: CheckoutField, error: FieldError) {
        self.errors.insert(field, error);
    }

    /// Returns the error recorded for a field, if any.
    pub fn get(&self, field: CheckoutField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Checks whether a field has an error.
    pub fn contains(&self, field: CheckoutField) -> bool {
        self.errors.contains_key(&field)
    }

    /// True when no field failed — the form is valid.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates errors in field display order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }
}

/// Log-friendly summary: `nombre: El nombre es requerido; email: Email inválido`.
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}

/// Serializes to the flat `{field: message}` object the form consumes.
impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in &self.errors {
            map.serialize_entry(field.key(), &error.to_string())?;
        }
        map.end()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_messages() {
        let err = CoreError::InvalidQuantity { quantity: -3 };
        assert_eq!(err.to_string(), "Invalid quantity: -3");

        let err = CoreError::LineNotFound { product_id: 42 };
        assert_eq!(err.to_string(), "Product 42 is not in the cart");
    }

    #[test]
    fn test_field_error_messages_are_the_ui_copy() {
        assert_eq!(FieldError::NameRequired.to_string(), "El nombre es requerido");
        assert_eq!(
            FieldError::PhoneInvalid.to_string(),
            "El teléfono debe tener 10 dígitos"
        );
        assert_eq!(
            FieldError::EmailMismatch.to_string(),
            "Los emails no coinciden"
        );
        assert_eq!(FieldError::EmptyCart.to_string(), "El carrito está vacío");
        assert_eq!(
            FieldError::OrderPersistence.to_string(),
            "Error al procesar la orden"
        );
    }

    #[test]
    fn test_validation_errors_map() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.insert(CheckoutField::Nombre, FieldError::NameRequired);
        errors.insert(CheckoutField::Email, FieldError::EmailInvalid);

        assert!(!errors.is_empty());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(CheckoutField::Nombre), Some(FieldError::NameRequired));
        assert_eq!(errors.get(CheckoutField::Telefono), None);
        assert!(errors.contains(CheckoutField::Email));
    }

    #[test]
    fn test_validation_errors_iterate_in_display_order() {
        let mut errors = ValidationErrors::new();
        // Insert out of order on purpose
        errors.insert(CheckoutField::ConfirmEmail, FieldError::EmailMismatch);
        errors.insert(CheckoutField::Nombre, FieldError::NameRequired);
        errors.insert(CheckoutField::Telefono, FieldError::PhoneRequired);

        let fields: Vec<CheckoutField> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            vec![
                CheckoutField::Nombre,
                CheckoutField::Telefono,
                CheckoutField::ConfirmEmail,
            ]
        );
    }

    #[test]
    fn test_validation_errors_serialize_as_flat_map() {
        let mut errors = ValidationErrors::new();
        errors.insert(CheckoutField::Nombre, FieldError::NameRequired);
        errors.insert(CheckoutField::ConfirmEmail, FieldError::EmailMismatch);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nombre": "El nombre es requerido",
                "confirmEmail": "Los emails no coinciden",
            })
        );
    }

    #[test]
    fn test_general_constructor() {
        let errors = ValidationErrors::general(FieldError::EmptyCart);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(CheckoutField::General),
            Some(FieldError::EmptyCart)
        );
    }
}
