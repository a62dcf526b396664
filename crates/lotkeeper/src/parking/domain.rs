use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, LicensePlateNumber};

/// Name of a parking facility; never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParkingLotName(String);

impl ParkingLotName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParkingLotName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParkingLotName> for String {
    fn from(value: ParkingLotName) -> Self {
        value.0
    }
}

impl fmt::Display for ParkingLotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative number of parking spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ParkingSpaceCount(u64);

impl ParkingSpaceCount {
    pub const ZERO: Self = Self(0);

    pub fn new(value: i64) -> Result<Self, DomainError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| DomainError::NegativeCount { value })
    }

    pub fn from_count(count: usize) -> Self {
        Self(count as u64)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Subtraction that fails with `NegativeCount` instead of wrapping.
    pub fn minus(self, other: Self) -> Result<Self, DomainError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(DomainError::NegativeCount {
                value: self.0 as i64 - other.0 as i64,
            })
    }

    /// Addition that fails with `CountOverflow` instead of saturating.
    pub fn plus(self, other: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(DomainError::CountOverflow {
                left: self.0,
                right: other.0,
            })
    }

    pub fn is_greater_than(self, other: Self) -> bool {
        self > other
    }

    pub fn is_less_than(self, other: Self) -> bool {
        self < other
    }
}

impl<'de> Deserialize<'de> for ParkingSpaceCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ParkingSpaceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One park/leave event for a plate at a lot. Transitions return new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingRecord {
    license_plate_number: LicensePlateNumber,
    parking_lot_name: ParkingLotName,
    parked_at: DateTime<Utc>,
    left_at: Option<DateTime<Utc>>,
}

impl ParkingRecord {
    /// Open (active) record starting at `parked_at`.
    pub fn park(
        license_plate_number: LicensePlateNumber,
        parking_lot_name: ParkingLotName,
        parked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            license_plate_number,
            parking_lot_name,
            parked_at,
            left_at: None,
        }
    }

    /// Rehydrate a stored record, open or closed.
    pub fn restore(
        license_plate_number: LicensePlateNumber,
        parking_lot_name: ParkingLotName,
        parked_at: DateTime<Utc>,
        left_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            license_plate_number,
            parking_lot_name,
            parked_at,
            left_at,
        }
    }

    pub fn license_plate_number(&self) -> &LicensePlateNumber {
        &self.license_plate_number
    }

    pub fn parking_lot_name(&self) -> &ParkingLotName {
        &self.parking_lot_name
    }

    pub fn parked_at(&self) -> DateTime<Utc> {
        self.parked_at
    }

    pub fn left_at(&self) -> Option<DateTime<Utc>> {
        self.left_at
    }

    pub fn is_parked(&self) -> bool {
        self.left_at.is_none()
    }

    pub fn leave(&self) -> Result<Self, DomainError> {
        self.leave_at(Utc::now())
    }

    pub fn leave_at(&self, left_at: DateTime<Utc>) -> Result<Self, DomainError> {
        if !self.is_parked() {
            return Err(DomainError::AlreadyLeft {
                plate: self.license_plate_number.clone(),
            });
        }
        Ok(Self {
            left_at: Some(left_at),
            ..self.clone()
        })
    }

    /// Elapsed time until `left_at`, or until `now` while still parked.
    pub fn parking_duration(&self, now: DateTime<Utc>) -> Duration {
        self.left_at.unwrap_or(now) - self.parked_at
    }
}

/// Read model computed from a lot's capacity and its active record count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingLotStatus {
    name: ParkingLotName,
    total_spaces: ParkingSpaceCount,
    available_spaces: ParkingSpaceCount,
    occupied_spaces: ParkingSpaceCount,
    occupancy_rate: f64,
}

impl ParkingLotStatus {
    pub fn new(
        name: ParkingLotName,
        total_spaces: ParkingSpaceCount,
        available_spaces: ParkingSpaceCount,
        occupied_spaces: ParkingSpaceCount,
        occupancy_rate: f64,
    ) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&occupancy_rate) {
            return Err(DomainError::InvalidStatus {
                reason: format!("occupancy rate {occupancy_rate} outside 0.0..=1.0"),
            });
        }
        if total_spaces.value() != available_spaces.value() + occupied_spaces.value() {
            return Err(DomainError::InvalidStatus {
                reason: format!(
                    "total {total_spaces} != available {available_spaces} + occupied {occupied_spaces}"
                ),
            });
        }
        Ok(Self {
            name,
            total_spaces,
            available_spaces,
            occupied_spaces,
            occupancy_rate,
        })
    }

    /// Derive the status from capacity and active count. More active records
    /// than capacity is a consistency bug and surfaces as `InvalidStatus`.
    pub fn from_counts(
        name: ParkingLotName,
        total_spaces: ParkingSpaceCount,
        occupied_spaces: ParkingSpaceCount,
    ) -> Result<Self, DomainError> {
        let available_spaces =
            total_spaces
                .minus(occupied_spaces)
                .map_err(|_| DomainError::InvalidStatus {
                    reason: format!(
                        "{occupied_spaces} active records exceed capacity {total_spaces} in {name}"
                    ),
                })?;
        let occupancy_rate = if total_spaces.value() > 0 {
            occupied_spaces.value() as f64 / total_spaces.value() as f64
        } else {
            0.0
        };
        Self::new(
            name,
            total_spaces,
            available_spaces,
            occupied_spaces,
            occupancy_rate,
        )
    }

    pub fn name(&self) -> &ParkingLotName {
        &self.name
    }

    pub fn total_spaces(&self) -> ParkingSpaceCount {
        self.total_spaces
    }

    pub fn available_spaces(&self) -> ParkingSpaceCount {
        self.available_spaces
    }

    pub fn occupied_spaces(&self) -> ParkingSpaceCount {
        self.occupied_spaces
    }

    pub fn occupancy_rate(&self) -> f64 {
        self.occupancy_rate
    }

    pub fn is_full(&self) -> bool {
        self.available_spaces.value() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_spaces.value() == 0
    }

    pub fn occupancy_percentage(&self) -> u32 {
        (self.occupancy_rate * 100.0).floor() as u32
    }
}

/// Admission rule shared by the in-memory aggregate and the store-backed
/// service: duplicate plates are rejected before capacity is considered.
pub(crate) fn check_admission(
    lot_name: &ParkingLotName,
    plate: &LicensePlateNumber,
    total_spaces: ParkingSpaceCount,
    occupied_spaces: ParkingSpaceCount,
    already_parked: bool,
) -> Result<(), DomainError> {
    if already_parked {
        return Err(DomainError::AlreadyParked {
            plate: plate.clone(),
        });
    }
    if occupied_spaces >= total_spaces {
        return Err(DomainError::LotFull {
            name: lot_name.to_string(),
        });
    }
    Ok(())
}
