use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::LicensePlateNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub Uuid);

impl CarId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Attributes supplied when registering a car. Model, owner and similar
/// details are not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarProperties {
    pub license_plate_number: LicensePlateNumber,
}

impl CarProperties {
    pub fn new(license_plate_number: LicensePlateNumber) -> Self {
        Self {
            license_plate_number,
        }
    }
}

/// Registered car as returned by the car store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
    pub license_plate_number: LicensePlateNumber,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    pub fn register(properties: CarProperties, now: DateTime<Utc>) -> Self {
        Self {
            id: CarId::generate(),
            license_plate_number: properties.license_plate_number,
            created_at: now,
            updated_at: now,
        }
    }
}
