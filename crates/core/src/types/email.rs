//! Email address type used for shipment contacts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty (after trimming).
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is not a dotted host name.
    #[error("email domain must be a host name such as example.com.au")]
    InvalidDomain,
    /// The input contains whitespace inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
}

/// A normalized email address.
///
/// Parsing trims surrounding whitespace and lower-cases the address, so two
/// spellings of the same mailbox compare equal. Carriers send booking
/// notifications to this address.
///
/// ## Examples
///
/// ```
/// use fitout_core::Email;
///
/// let email = Email::parse("  Sam@Example.com.au ").unwrap();
/// assert_eq!(email.as_str(), "sam@example.com.au");
///
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("user@localhost").is_err()); // no dot in domain
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an `Email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, contains
    /// whitespace, does not have exactly one `@`, has an empty local part, or
    /// has a domain without an inner dot.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("orders@fitout.com.au").is_ok());
        assert!(Email::parse("first.last+van@example.com").is_ok());
        assert!(Email::parse("a@b.co").is_ok());
    }

    #[test]
    fn test_parse_normalizes() {
        let email = Email::parse("  Driver@Example.COM\n").unwrap();
        assert_eq!(email.as_str(), "driver@example.com");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_parse_empty_and_blank() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_at_symbol_count() {
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::AtSymbol));
    }

    #[test]
    fn test_parse_inner_whitespace() {
        assert_eq!(Email::parse("sam smith@x.com"), Err(EmailError::Whitespace));
    }

    #[test]
    fn test_parse_bad_domain() {
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("user@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@localhost"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@example."), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let email: Email = serde_json::from_str("\"Ops@Fitout.com.au\"").unwrap();
        assert_eq!(email.to_string(), "ops@fitout.com.au");
    }
}
