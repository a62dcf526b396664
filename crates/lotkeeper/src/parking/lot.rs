use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    check_admission, ParkingLotName, ParkingLotStatus, ParkingRecord, ParkingSpaceCount,
};
use crate::domain::{DomainError, LicensePlateNumber};

/// Lot aggregate. Stores persist only `name` and `total_spaces`; the
/// `parked_cars` map is populated when the aggregate is driven in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    name: ParkingLotName,
    total_spaces: ParkingSpaceCount,
    #[serde(skip)]
    parked_cars: HashMap<LicensePlateNumber, ParkingRecord>,
}

impl ParkingLot {
    pub fn new(name: ParkingLotName, total_spaces: ParkingSpaceCount) -> Self {
        Self {
            name,
            total_spaces,
            parked_cars: HashMap::new(),
        }
    }

    pub fn name(&self) -> &ParkingLotName {
        &self.name
    }

    pub fn total_spaces(&self) -> ParkingSpaceCount {
        self.total_spaces
    }

    pub fn occupied_spaces(&self) -> ParkingSpaceCount {
        ParkingSpaceCount::from_count(self.parked_cars.len())
    }

    pub fn available_spaces(&self) -> ParkingSpaceCount {
        // parked_cars never grows past total_spaces, see park_car_at
        self.total_spaces
            .minus(self.occupied_spaces())
            .unwrap_or(ParkingSpaceCount::ZERO)
    }

    pub fn park_car(&mut self, plate: LicensePlateNumber) -> Result<ParkingRecord, DomainError> {
        self.park_car_at(plate, Utc::now())
    }

    pub fn park_car_at(
        &mut self,
        plate: LicensePlateNumber,
        parked_at: DateTime<Utc>,
    ) -> Result<ParkingRecord, DomainError> {
        check_admission(
            &self.name,
            &plate,
            self.total_spaces,
            self.occupied_spaces(),
            self.parked_cars.contains_key(&plate),
        )?;

        let record = ParkingRecord::park(plate.clone(), self.name.clone(), parked_at);
        self.parked_cars.insert(plate, record.clone());
        Ok(record)
    }

    pub fn leave_car(&mut self, plate: &LicensePlateNumber) -> Result<ParkingRecord, DomainError> {
        self.leave_car_at(plate, Utc::now())
    }

    pub fn leave_car_at(
        &mut self,
        plate: &LicensePlateNumber,
        left_at: DateTime<Utc>,
    ) -> Result<ParkingRecord, DomainError> {
        let record = self
            .parked_cars
            .get(plate)
            .ok_or_else(|| DomainError::NotParked {
                plate: plate.clone(),
            })?;

        let left = record.leave_at(left_at)?;
        self.parked_cars.remove(plate);
        Ok(left)
    }

    pub fn status(&self) -> Result<ParkingLotStatus, DomainError> {
        ParkingLotStatus::from_counts(
            self.name.clone(),
            self.total_spaces,
            self.occupied_spaces(),
        )
    }

    pub fn parked_cars(&self) -> Vec<ParkingRecord> {
        self.parked_cars.values().cloned().collect()
    }
}
