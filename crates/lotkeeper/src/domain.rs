//! Shared kernel for the car and parking-lot modules: the plate identifier and
//! the domain error taxonomy both sides raise.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Korean plate layout: `[region 0-2 hangul] [1-3 digits] [1 hangul] [4 digits]`,
/// each separator being an optional single whitespace.
/// Accepts "서울 123 가 1234", "123 가 1234", "12가1234".
const LICENSE_PLATE_PATTERN: &str = r"^[가-힣]{0,2}\s?[0-9]{1,3}\s?[가-힣]\s?[0-9]{4}$";

fn license_plate_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(LICENSE_PLATE_PATTERN).expect("plate pattern compiles"))
}

/// Validated license plate, the natural key for "is this vehicle parked".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LicensePlateNumber(String);

impl LicensePlateNumber {
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if license_plate_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidFormat { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicensePlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LicensePlateNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Synchronous, non-retryable domain failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid license plate format: {value}")]
    InvalidFormat { value: String },
    #[error("parking lot name must not be blank")]
    EmptyName,
    #[error("parking space count must be zero or greater, got {value}")]
    NegativeCount { value: i64 },
    #[error("parking space count overflows: {left} + {right}")]
    CountOverflow { left: u64, right: u64 },
    #[error("vehicle {plate} has already left")]
    AlreadyLeft { plate: LicensePlateNumber },
    #[error("parking lot already exists: {name}")]
    AlreadyExists { name: String },
    #[error("parking lot not found: {name}")]
    NotFound { name: String },
    #[error("vehicle is already parked: {plate}")]
    AlreadyParked { plate: LicensePlateNumber },
    #[error("parking lot is full: {name}")]
    LotFull { name: String },
    #[error("vehicle is not parked: {plate}")]
    NotParked { plate: LicensePlateNumber },
    #[error("parking lot still has parked vehicles: {name}")]
    LotNotEmpty { name: String },
    #[error("inconsistent parking lot status: {reason}")]
    InvalidStatus { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plates_matching_the_layout() {
        let valid = [
            "서울 123 가 1234",
            "경기 12 나 3456",
            "부산 1 다 7890",
            "123 가 1234",
            "12가1234",
            "서울123가1234",
            "1가1234",
        ];

        for raw in valid {
            let plate = LicensePlateNumber::parse(raw).expect("plate is valid");
            assert_eq!(plate.as_str(), raw);
        }
    }

    #[test]
    fn rejects_plates_outside_the_layout() {
        let invalid = [
            "invalid",
            "123456",
            "abc def",
            "",
            "서울 abc 가 1234",
            "서울 123 가 abc",
            "서울 1234 가 1234",
            "서울 123 가가 1234",
            "서울 123 가 12345",
            "12가1234 ",
        ];

        for raw in invalid {
            match LicensePlateNumber::parse(raw) {
                Err(DomainError::InvalidFormat { value }) => assert_eq!(value, raw),
                other => panic!("expected invalid format for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn plates_compare_by_value() {
        let first = LicensePlateNumber::parse("서울 123 가 1234").expect("valid");
        let second = LicensePlateNumber::parse("서울 123 가 1234").expect("valid");
        assert_eq!(first, second);
        assert_ne!(first, LicensePlateNumber::parse("12가1234").expect("valid"));
    }

    #[test]
    fn invalid_format_message_names_the_plate() {
        let error = LicensePlateNumber::parse("invalid-plate").expect_err("rejected");
        assert!(error.to_string().contains("invalid-plate"));
    }

    #[test]
    fn deserialization_validates_plates() {
        let plate: LicensePlateNumber = serde_json::from_str("\"12가3456\"").expect("valid plate");
        assert_eq!(plate.as_str(), "12가3456");
        assert!(serde_json::from_str::<LicensePlateNumber>("\"nope\"").is_err());
    }
}
