//! Australian postcode type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Postcode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostcodeError {
    /// The input string is empty.
    #[error("postcode cannot be empty")]
    Empty,
    /// The input is not exactly four characters long.
    #[error("postcode must be exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters supplied.
        actual: usize,
    },
    /// The input contains something other than ASCII digits.
    #[error("postcode must contain only digits")]
    NonDigit,
}

/// A four digit Australian postcode.
///
/// Stored as a string so leading zeros survive (`0800` is Darwin).
///
/// ## Examples
///
/// ```
/// use fitout_core::Postcode;
///
/// assert!(Postcode::parse("3000").is_ok());
/// assert!(Postcode::parse("0800").is_ok());
///
/// assert!(Postcode::parse("300").is_err());   // too short
/// assert!(Postcode::parse("30000").is_err()); // too long
/// assert!(Postcode::parse("30a0").is_err());  // not a digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Postcode(String);

impl Postcode {
    /// Number of digits in an Australian postcode.
    pub const LENGTH: usize = 4;

    /// Parse a `Postcode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly four ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PostcodeError> {
        if s.is_empty() {
            return Err(PostcodeError::Empty);
        }

        let actual = s.chars().count();
        if actual != Self::LENGTH {
            return Err(PostcodeError::WrongLength {
                expected: Self::LENGTH,
                actual,
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostcodeError::NonDigit);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the postcode as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Postcode {
    type Err = PostcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Postcode {
    type Error = PostcodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Postcode> for String {
    fn from(postcode: Postcode) -> Self {
        postcode.0
    }
}
