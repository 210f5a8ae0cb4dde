//! Review rating type.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// The input is not a number.
    #[error("rating must be a number")]
    NotANumber,
    /// The input is NaN or infinite.
    #[error("rating must be a finite number")]
    NotFinite,
}

/// A numeric review rating.
///
/// Ratings are only type-checked: any finite number is accepted, there is no
/// range restriction.
///
/// ```
/// use recipe_book_core::Rating;
///
/// assert_eq!("4".parse::<Rating>().unwrap().value(), 4.0);
/// assert!("four".parse::<Rating>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Create a rating from a raw value.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::NotFinite` for NaN or infinite values.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(RatingError::NotFinite)
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| RatingError::NotANumber)?;
        Self::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_and_decimal() {
        assert!(("3".parse::<Rating>().unwrap().value() - 3.0).abs() < f64::EPSILON);
        assert!((" 4.5 ".parse::<Rating>().unwrap().value() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rejects_words() {
        assert_eq!("great".parse::<Rating>(), Err(RatingError::NotANumber));
        assert_eq!("".parse::<Rating>(), Err(RatingError::NotANumber));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!("NaN".parse::<Rating>(), Err(RatingError::NotFinite));
        assert_eq!(Rating::new(f64::INFINITY), Err(RatingError::NotFinite));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rating::new(5.0).unwrap().to_string(), "5");
    }
}
