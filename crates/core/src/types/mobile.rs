//! Mobile number type.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Mobile`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MobileError {
    /// The input string is empty.
    #[error("mobile number cannot be empty")]
    Empty,
    /// The input is not exactly ten ASCII digits.
    #[error("mobile number must be {len} digits")]
    InvalidFormat {
        /// Required number of digits.
        len: usize,
    },
}

/// A ten-digit Indian mobile number, stored without the country code.
///
/// ```
/// use freshco_core::Mobile;
///
/// assert_eq!(Mobile::parse(" 9876543210 ").unwrap().as_str(), "9876543210");
/// assert!(Mobile::parse("98765").is_err());
/// assert!(Mobile::parse("+919876543210").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Mobile(String);

impl Mobile {
    /// Number of digits in a mobile number.
    pub const LENGTH: usize = 10;

    /// Country calling code used when addressing SMS.
    pub const COUNTRY_CODE: &'static str = "+91";

    /// Parse a mobile number, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or is not exactly ten
    /// ASCII digits.
    pub fn parse(s: &str) -> Result<Self, MobileError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(MobileError::Empty);
        }

        if s.len() != Self::LENGTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MobileError::InvalidFormat { len: Self::LENGTH });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number with its country code, as SMS gateways expect it.
    #[must_use]
    pub fn international(&self) -> String {
        format!("{}{}", Self::COUNTRY_CODE, self.0)
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Mobile {
    type Err = MobileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Mobile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let mobile = Mobile::parse("9876543210").unwrap();
        assert_eq!(mobile.as_str(), "9876543210");
        assert_eq!(mobile.international(), "+919876543210");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Mobile::parse("  "), Err(MobileError::Empty));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        for bad in ["987654321", "98765432101", "98765 43210", "98765432a0", "९८७६५४३२१०"] {
            assert_eq!(
                Mobile::parse(bad),
                Err(MobileError::InvalidFormat { len: 10 }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let mobile: Mobile = serde_json::from_str("\"9876543210\"").unwrap();
        assert_eq!(mobile.to_string(), "9876543210");
        assert!(serde_json::from_str::<Mobile>("\"12\"").is_err());
    }
}
