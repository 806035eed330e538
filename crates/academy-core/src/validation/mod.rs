//! Form validators.
//!
//! Small pure predicates used by every form before submission, plus the
//! [`FieldError`] type the forms report back with.
//!
//! # Usage
//!
//! ```
//! use academy_core::validation::{is_valid_email, is_valid_phone, password_strength};
//!
//! assert!(is_valid_email("coach@academy.tn"));
//! assert!(is_valid_phone("22123456"));
//! assert_eq!(password_strength("Abcdef12!@#"), 5);
//! ```

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum [`password_strength`] score accepted when creating a coach account.
pub const MIN_COACH_PASSWORD_STRENGTH: u8 = 3;

/// Upper bound of [`password_strength`].
pub const MAX_PASSWORD_STRENGTH: u8 = 5;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("phone regex is valid"));

/// Returns true when `s` looks like `local@domain.tld`.
///
/// Intentionally permissive: no RFC 5322 handling.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Returns true when `s` is exactly 8 ASCII digits.
pub fn is_valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

/// Scores a password from 0 to 5.
///
/// One point each for length >= 8, length >= 12, an uppercase letter, a
/// lowercase letter, a digit and a symbol; the total is capped at 5.
pub fn password_strength(s: &str) -> u8 {
    let len = s.chars().count();
    let checks = [
        len >= 8,
        len >= 12,
        s.chars().any(|c| c.is_uppercase()),
        s.chars().any(|c| c.is_lowercase()),
        s.chars().any(|c| c.is_ascii_digit()),
        s.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    ];
    let score = checks.iter().filter(|passed| **passed).count() as u8;
    score.min(MAX_PASSWORD_STRENGTH)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parses an `HH:MM` time.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Label shown next to the strength bar.
pub fn password_strength_label(score: u8) -> &'static str {
    match score {
        0 | 1 => "Very weak",
        2 => "Weak",
        3 => "Medium",
        4 => "Strong",
        _ => "Very strong",
    }
}

/// A validation failure attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Form field name (e.g. "email").
    pub field: String,
    /// Human-readable message rendered inline.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collects field errors for one form.
#[derive(Debug, Default)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Records an error when `value` is blank.
    pub fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{} is required", label));
        }
    }

    /// Records an error when `value` is present but not an email address.
    pub fn optional_email(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && !is_valid_email(value.trim()) {
            self.push(field, "Invalid email address");
        }
    }

    /// Records an error when `value` is missing or not an email address.
    pub fn required_email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "Email is required");
        } else if !is_valid_email(value.trim()) {
            self.push(field, "Invalid email address");
        }
    }

    /// Records an error when `value` is present but not 8 digits.
    pub fn optional_phone(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && !is_valid_phone(value.trim()) {
            self.push(field, "Phone number must be 8 digits");
        }
    }

    /// Records an error when `value` is present but not a `YYYY-MM-DD` date.
    pub fn optional_date(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && parse_date(value).is_none() {
            self.push(field, "Invalid date");
        }
    }

    /// Records an error when `value` is missing or not a `YYYY-MM-DD` date.
    pub fn required_date(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{} is required", label));
        } else if parse_date(value).is_none() {
            self.push(field, "Invalid date");
        }
    }

    /// Records an error when `value` is present but not an `HH:MM` time.
    pub fn optional_time(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && parse_time(value).is_none() {
            self.push(field, "Invalid time");
        }
    }

    /// Records an error when the confirmation differs from the password.
    pub fn passwords_match(&mut self, password: &str, confirm: &str) {
        if password != confirm {
            self.push("confirmPassword", "Passwords do not match");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(())` when no error was recorded, otherwise the collected errors.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_requires_dot_in_domain() {
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_email("a@b.com"));
    }

    #[test]
    fn test_email_rejects_whitespace_and_double_at() {
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_exactly_eight_digits() {
        assert!(!is_valid_phone("1234567"));
        assert!(is_valid_phone("12345678"));
        assert!(!is_valid_phone("123456789"));
        assert!(!is_valid_phone("1234 5678"));
        assert!(!is_valid_phone("1234567a"));
    }

    #[test]
    fn test_password_strength_scores() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 1);
        assert_eq!(password_strength("abcdefgh"), 2);
        assert_eq!(password_strength("Abcdefg1"), 4);
        assert_eq!(password_strength("Abcdef12!@#"), 5);
        // six criteria met, still capped
        assert_eq!(password_strength("Abcdefgh12!@#"), 5);
    }

    #[test]
    fn test_parse_date_and_time() {
        assert!(parse_date("2025-03-01").is_some());
        assert!(parse_date("01/03/2025").is_none());
        assert!(parse_time("17:30").is_some());
        assert!(parse_time("25:00").is_none());
    }

    #[test]
    fn test_strength_label() {
        assert_eq!(password_strength_label(0), "Very weak");
        assert_eq!(password_strength_label(3), "Medium");
        assert_eq!(password_strength_label(5), "Very strong");
    }

    #[test]
    fn test_form_errors_collects_in_order() {
        let mut errors = FormErrors::new();
        errors.require("firstName", "  ", "First name");
        errors.optional_email("email", "nope");
        errors.optional_phone("phone", "");
        errors.passwords_match("secret", "Secret");

        let errors = errors.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "firstName");
        assert_eq!(errors[1].message, "Invalid email address");
        assert_eq!(errors[2].field, "confirmPassword");
    }
}
