//! User record model and field validation.
//!
//! # Responsibility
//! - Define the canonical `id,name,email` record.
//! - Validate user input before it reaches the store.
//!
//! # Invariants
//! - `id`, `name` and `email` are non-empty after trimming.
//! - No field contains `,` or a line break; the file format has no escaping.
//! - `email` matches `<non-at>@<non-at>.<non-at>`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field separator of the on-disk format.
pub const FIELD_DELIMITER: char = ',';

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex"));

/// Validation failures for user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// One or more of id/name/email is blank.
    MissingFields,
    /// Update/delete called without an id.
    MissingId,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// A field contains the delimiter or a line break.
    ForbiddenCharacter { field: &'static str },
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "All fields (ID, Name, Email) are required."),
            Self::MissingId => write!(f, "User ID is required."),
            Self::InvalidEmail(_) => write!(f, "Invalid email format."),
            Self::ForbiddenCharacter { field } => {
                write!(f, "{field} must not contain commas or line breaks.")
            }
        }
    }
}

impl Error for UserValidationError {}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque identifier, unique within one store.
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserRecord {
    /// Builds a validated record from raw input.
    ///
    /// Values are trimmed before validation.
    ///
    /// # Errors
    /// - `MissingFields` when any value is blank.
    /// - `ForbiddenCharacter` when any value contains `,` or a line break.
    /// - `InvalidEmail` when `email` fails the address pattern.
    pub fn new(
        id: impl AsRef<str>,
        name: impl AsRef<str>,
        email: impl AsRef<str>,
    ) -> Result<Self, UserValidationError> {
        let id = id.as_ref().trim();
        let name = name.as_ref().trim();
        let email = email.as_ref().trim();

        if id.is_empty() || name.is_empty() || email.is_empty() {
            return Err(UserValidationError::MissingFields);
        }
        check_field("id", id)?;
        check_field("name", name)?;
        check_field("email", email)?;
        if !is_valid_email(email) {
            return Err(UserValidationError::InvalidEmail(email.to_string()));
        }

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Renders the record as one store line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.id, self.name, self.email
        )
    }
}

/// Returns whether `email` matches the accepted address shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Rejects values the delimited format cannot represent.
pub fn check_field(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.contains([FIELD_DELIMITER, '\n', '\r']) {
        return Err(UserValidationError::ForbiddenCharacter { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, UserRecord, UserValidationError};

    #[test]
    fn email_pattern_accepts_simple_addresses() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("a.b@c.d.e"));
    }

    #[test]
    fn email_pattern_rejects_malformed_addresses() {
        for value in ["", "plain", "john@example", "@example.com", "a@b@c.d", "a@b."] {
            assert!(!is_valid_email(value), "`{value}` should be rejected");
        }
    }

    #[test]
    fn new_trims_values() {
        let record = UserRecord::new(" 1 ", " John Doe ", " john@example.com ").unwrap();
        assert_eq!(record.to_line(), "1,John Doe,john@example.com");
    }

    #[test]
    fn new_rejects_blank_fields_before_email_check() {
        let err = UserRecord::new("1", "   ", "not-an-email").unwrap_err();
        assert_eq!(err, UserValidationError::MissingFields);
    }

    #[test]
    fn new_rejects_delimiter_in_name() {
        let err = UserRecord::new("1", "Doe, John", "john@example.com").unwrap_err();
        assert_eq!(err, UserValidationError::ForbiddenCharacter { field: "name" });
    }
}
