//! Input validation for lead intake fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Invalid phone format.
    InvalidPhone(String),
    /// Budget bounds are inverted.
    InvalidBudgetRange { min: i64, max: i64 },
    /// A numeric field that must be positive is not.
    NonPositive(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Neither email nor phone was supplied.
    MissingContact,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::InvalidPhone(msg) => write!(f, "Invalid phone: {}", msg),
            ValidationError::InvalidBudgetRange { min, max } => {
                write!(f, "Budget minimum {} exceeds maximum {}", min, max)
            }
            ValidationError::NonPositive(field) => write!(f, "{} must be positive", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::MissingContact => {
                write!(f, "at least one of email or phone is required")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for contact names and project titles.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum allowed length for phone numbers.
pub const MAX_PHONE_LENGTH: usize = 20;

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one character after @
/// - Has at least one dot after @
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    // Basic format check: local@domain.tld
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a phone number.
///
/// Accepts digits with an optional leading `+` and common separators
/// (spaces, dashes, parentheses); requires at least 7 digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Empty("phone".to_string()));
    }

    if phone.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LENGTH,
            actual: phone.len(),
        });
    }

    let mut digits = 0usize;
    for (i, c) in phone.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '+' if i == 0 => {}
            ' ' | '-' | '(' | ')' => {}
            _ => {
                return Err(ValidationError::InvalidPhone(format!(
                    "invalid character '{}'",
                    c
                )))
            }
        }
    }

    if digits < 7 {
        return Err(ValidationError::InvalidPhone(
            "must contain at least 7 digits".to_string(),
        ));
    }

    Ok(())
}

/// Validate a budget range when both bounds are present.
pub fn validate_budget_range(min: i64, max: i64) -> Result<(), ValidationError> {
    if min < 0 {
        return Err(ValidationError::NonPositive("budget minimum".to_string()));
    }
    if min > max {
        return Err(ValidationError::InvalidBudgetRange { min, max });
    }
    Ok(())
}

/// Validate a required short text field (name, title).
pub fn validate_required_text(field: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if value.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
            actual: value.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email(" test@example.com ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_email_invalid() {
        // Empty
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));

        // No @
        assert!(matches!(
            validate_email("test.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Multiple @
        assert!(matches!(
            validate_email("test@example@com"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Missing local part
        assert!(matches!(
            validate_email("@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Missing domain
        assert!(matches!(
            validate_email("test@"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // No dot in domain
        assert!(matches!(
            validate_email("test@localhost"),
            Err(ValidationError::InvalidEmail(_))
        ));

        // Consecutive dots
        assert!(matches!(
            validate_email("test@example..com"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_phone_valid() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("(022) 555-0134").is_ok());
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(matches!(validate_phone(""), Err(ValidationError::Empty(_))));

        // Too few digits
        assert!(matches!(
            validate_phone("12345"),
            Err(ValidationError::InvalidPhone(_))
        ));

        // Letters
        assert!(matches!(
            validate_phone("98765abcde"),
            Err(ValidationError::InvalidPhone(_))
        ));

        // Plus not at start
        assert!(matches!(
            validate_phone("98+76543210"),
            Err(ValidationError::InvalidPhone(_))
        ));

        // Too long
        assert!(matches!(
            validate_phone("+91 98765 43210 98765 43210"),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_budget_range() {
        assert!(validate_budget_range(100_000, 500_000).is_ok());
        assert!(validate_budget_range(0, 0).is_ok());

        assert!(matches!(
            validate_budget_range(500_000, 100_000),
            Err(ValidationError::InvalidBudgetRange { .. })
        ));

        assert!(matches!(
            validate_budget_range(-1, 100),
            Err(ValidationError::NonPositive(_))
        ));
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("name", "Asha Rao").is_ok());

        assert!(matches!(
            validate_required_text("name", "   "),
            Err(ValidationError::Empty(_))
        ));

        let long = "a".repeat(200);
        assert!(matches!(
            validate_required_text("name", &long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidEmail("test message".to_string());
        assert_eq!(err.to_string(), "Invalid email: test message");

        let err = ValidationError::InvalidBudgetRange {
            min: 500,
            max: 100,
        };
        assert_eq!(err.to_string(), "Budget minimum 500 exceeds maximum 100");

        assert_eq!(
            ValidationError::MissingContact.to_string(),
            "at least one of email or phone is required"
        );
    }
}
