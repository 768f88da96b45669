//! # Validation Module
//!
//! Checkout form validation for the Tienda storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Input masks, required markers                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (authoritative)                                  │
//! │  ├── Every rule checked independently                                  │
//! │  └── All violations reported together, never short-circuited           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK constraints as the last line                     │
//! │                                                                         │
//! │  The form renders ALL failing fields at once, so a buyer fixes the     │
//! │  whole form in one pass instead of being drip-fed one error at a time. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::types::CheckoutForm;
//! use tienda_core::validation::validate_checkout_form;
//!
//! let form = CheckoutForm::default(); // everything blank
//! let errors = validate_checkout_form(&form);
//! assert!(!errors.is_empty());
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CheckoutField, FieldError, ValidationErrors};
use crate::types::CheckoutForm;

/// Exactly this many digits make a valid phone number.
pub const PHONE_DIGITS: usize = 10;

/// Anchored: the whole value must be exactly ten digits, nothing else.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone regex is valid"));

/// Deliberately permissive `text@text.text` shape; real deliverability is
/// the mail provider's problem, not the checkout form's.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex is valid"));

/// Checks the 10-digit phone shape on the raw value.
///
/// Note the value is NOT trimmed first: a phone with stray spaces fails
/// the anchored pattern and surfaces the format message, which is what
/// the buyer needs to hear.
pub fn is_valid_phone(telefono: &str) -> bool {
    PHONE_RE.is_match(telefono)
}

/// Checks the permissive email shape on the raw value.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates the whole checkout form and returns every failure at once.
///
/// ## Rules
/// - `nombre` / `apellido`: non-blank after trimming.
/// - `telefono`: non-blank, else exactly [`PHONE_DIGITS`] digits. Two
///   distinct messages so the buyer knows whether the field is missing
///   or malformed.
/// - `email`: non-blank, else permissive `text@text.text` shape. Same
///   two-message split.
/// - `confirm_email`: must equal `email` exactly (case-sensitive, raw).
///   Checked independently of the email-format rule, so a well-formed
///   email with a bad confirmation still reports only the mismatch.
///
/// The form is valid iff the returned map is empty.
pub fn validate_checkout_form(form: &CheckoutForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.nombre.trim().is_empty() {
        errors.insert(CheckoutField::Nombre, FieldError::NameRequired);
    }

    if form.apellido.trim().is_empty() {
        errors.insert(CheckoutField::Apellido, FieldError::LastNameRequired);
    }

    if form.telefono.trim().is_empty() {
        errors.insert(CheckoutField::Telefono, FieldError::PhoneRequired);
    } else if !is_valid_phone(&form.telefono) {
        errors.insert(CheckoutField::Telefono, FieldError::PhoneInvalid);
    }

    if form.email.trim().is_empty() {
        errors.insert(CheckoutField::Email, FieldError::EmailRequired);
    } else if !is_valid_email(&form.email) {
        errors.insert(CheckoutField::Email, FieldError::EmailInvalid);
    }

    if form.email != form.confirm_email {
        errors.insert(CheckoutField::ConfirmEmail, FieldError::EmailMismatch);
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            telefono: "5551234567".to_string(),
            email: "ana@example.com".to_string(),
            confirm_email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let errors = validate_checkout_form(&valid_form());
        assert!(errors.is_empty());
    }

    /// Every rule is independent: a fully blank form reports every
    /// required-field key simultaneously, nothing short-circuits.
    #[test]
    fn test_blank_form_reports_all_fields_at_once() {
        let errors = validate_checkout_form(&CheckoutForm::default());

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(CheckoutField::Nombre), Some(FieldError::NameRequired));
        assert_eq!(
            errors.get(CheckoutField::Apellido),
            Some(FieldError::LastNameRequired)
        );
        assert_eq!(
            errors.get(CheckoutField::Telefono),
            Some(FieldError::PhoneRequired)
        );
        assert_eq!(errors.get(CheckoutField::Email), Some(FieldError::EmailRequired));
        // Both emails are blank and therefore equal: no mismatch
        assert_eq!(errors.get(CheckoutField::ConfirmEmail), None);
    }

    #[test]
    fn test_all_fields_invalid_including_mismatch() {
        let form = CheckoutForm {
            nombre: "   ".to_string(),
            apellido: "".to_string(),
            telefono: "abc".to_string(),
            email: "not-an-email".to_string(),
            confirm_email: "different".to_string(),
        };

        let errors = validate_checkout_form(&form);
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(CheckoutField::Nombre));
        assert!(errors.contains(CheckoutField::Apellido));
        assert_eq!(
            errors.get(CheckoutField::Telefono),
            Some(FieldError::PhoneInvalid)
        );
        assert_eq!(errors.get(CheckoutField::Email), Some(FieldError::EmailInvalid));
        assert_eq!(
            errors.get(CheckoutField::ConfirmEmail),
            Some(FieldError::EmailMismatch)
        );
    }

    #[test]
    fn test_whitespace_only_name_is_required() {
        let form = CheckoutForm {
            nombre: "   ".to_string(),
            ..valid_form()
        };
        let errors = validate_checkout_form(&form);
        assert_eq!(errors.get(CheckoutField::Nombre), Some(FieldError::NameRequired));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_phone_nine_digits_is_invalid() {
        let form = CheckoutForm {
            telefono: "555123456".to_string(), // 9 digits
            ..valid_form()
        };
        let errors = validate_checkout_form(&form);
        assert_eq!(
            errors.get(CheckoutField::Telefono),
            Some(FieldError::PhoneInvalid)
        );
    }

    #[test]
    fn test_phone_ten_digits_is_valid() {
        let form = CheckoutForm {
            telefono: "5551234567".to_string(), // 10 digits
            ..valid_form()
        };
        let errors = validate_checkout_form(&form);
        assert!(!errors.contains(CheckoutField::Telefono));
    }

    #[test]
    fn test_phone_empty_and_malformed_use_distinct_messages() {
        let empty = CheckoutForm {
            telefono: "".to_string(),
            ..valid_form()
        };
        assert_eq!(
            validate_checkout_form(&empty).get(CheckoutField::Telefono),
            Some(FieldError::PhoneRequired)
        );

        let malformed = CheckoutForm {
            telefono: "555-123-4567".to_string(),
            ..valid_form()
        };
        assert_eq!(
            validate_checkout_form(&malformed).get(CheckoutField::Telefono),
            Some(FieldError::PhoneInvalid)
        );
    }

    /// The anchored pattern runs on the raw value: stray whitespace is a
    /// format failure, not silently tolerated.
    #[test]
    fn test_phone_with_stray_whitespace_is_malformed() {
        let form = CheckoutForm {
            telefono: " 5551234567".to_string(),
            ..valid_form()
        };
        assert_eq!(
            validate_checkout_form(&form).get(CheckoutField::Telefono),
            Some(FieldError::PhoneInvalid)
        );
    }

    #[test]
    fn test_email_mismatch_is_the_only_error_for_truncated_confirm() {
        let form = CheckoutForm {
            email: "a@b.com".to_string(),
            confirm_email: "a@b.co".to_string(),
            ..valid_form()
        };

        let errors = validate_checkout_form(&form);
        // a@b.com itself is well-formed, so only the confirmation fails
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(CheckoutField::ConfirmEmail),
            Some(FieldError::EmailMismatch)
        );
    }

    #[test]
    fn test_email_mismatch_is_case_sensitive() {
        let form = CheckoutForm {
            email: "Ana@example.com".to_string(),
            confirm_email: "ana@example.com".to_string(),
            ..valid_form()
        };
        assert_eq!(
            validate_checkout_form(&form).get(CheckoutField::ConfirmEmail),
            Some(FieldError::EmailMismatch)
        );
    }

    #[test]
    fn test_email_without_dot_after_at_is_invalid() {
        let form = CheckoutForm {
            email: "user@mail".to_string(),
            confirm_email: "user@mail".to_string(),
            ..valid_form()
        };
        assert_eq!(
            validate_checkout_form(&form).get(CheckoutField::Email),
            Some(FieldError::EmailInvalid)
        );
    }

    /// The email shape is an unanchored search by design. Values with
    /// leading junk still pass as long as something inside looks like
    /// text@text.text — deliberately permissive, not an oversight.
    #[test]
    fn test_email_shape_is_permissive() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("user@mail.example.com"));
        assert!(is_valid_email("nombre apellido@dominio.com"));

        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@domain.com"));
    }
}
