use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::domain::{ParkingLotName, ParkingRecord, ParkingSpaceCount};
use super::lot::ParkingLot;
use super::ports::{ParkingLotLoadPort, ParkingLotSavePort};
use crate::domain::LicensePlateNumber;
use crate::repository::RepositoryError;

/// Process-local lot and record store.
///
/// Closed records are kept as history; the active index only tracks records
/// whose `left_at` is empty, which doubles as the unique constraint on
/// "one active record per plate".
#[derive(Default)]
pub struct InMemoryParkingStore {
    state: Mutex<ParkingState>,
}

#[derive(Default)]
struct ParkingState {
    lots: BTreeMap<ParkingLotName, ParkingSpaceCount>,
    records: Vec<ParkingRecord>,
    active: HashMap<LicensePlateNumber, usize>,
}

impl InMemoryParkingStore {
    fn state(&self) -> Result<MutexGuard<'_, ParkingState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("parking store mutex poisoned".to_string()))
    }

    /// Every record ever saved for the plate, oldest first.
    pub fn history(&self, plate: &LicensePlateNumber) -> Result<Vec<ParkingRecord>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .records
            .iter()
            .filter(|record| record.license_plate_number() == plate)
            .cloned()
            .collect())
    }

    pub fn lot_names(&self) -> Result<Vec<ParkingLotName>, RepositoryError> {
        Ok(self.state()?.lots.keys().cloned().collect())
    }
}

impl ParkingLotLoadPort for InMemoryParkingStore {
    fn load_parking_lot(&self, name: &ParkingLotName) -> Result<Option<ParkingLot>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .lots
            .get(name)
            .map(|total| ParkingLot::new(name.clone(), *total)))
    }

    fn load_parking_record(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<ParkingRecord>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .active
            .get(plate)
            .map(|index| state.records[*index].clone()))
    }

    fn load_parked_cars(
        &self,
        lot_name: &ParkingLotName,
    ) -> Result<Vec<ParkingRecord>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .active
            .values()
            .map(|index| &state.records[*index])
            .filter(|record| record.parking_lot_name() == lot_name)
            .cloned()
            .collect())
    }

    fn exists_parking_lot(&self, name: &ParkingLotName) -> Result<bool, RepositoryError> {
        Ok(self.state()?.lots.contains_key(name))
    }
}

impl ParkingLotSavePort for InMemoryParkingStore {
    fn save_parking_lot(&self, lot: ParkingLot) -> Result<ParkingLot, RepositoryError> {
        let mut state = self.state()?;
        if state.lots.contains_key(lot.name()) {
            return Err(RepositoryError::Conflict);
        }
        state.lots.insert(lot.name().clone(), lot.total_spaces());
        debug!(lot = %lot.name(), total_spaces = %lot.total_spaces(), "parking lot stored");
        Ok(ParkingLot::new(lot.name().clone(), lot.total_spaces()))
    }

    fn save_parking_record(&self, record: ParkingRecord) -> Result<ParkingRecord, RepositoryError> {
        let mut state = self.state()?;
        if !state.lots.contains_key(record.parking_lot_name()) {
            return Err(RepositoryError::NotFound);
        }
        if record.is_parked() && state.active.contains_key(record.license_plate_number()) {
            return Err(RepositoryError::Conflict);
        }

        let index = state.records.len();
        state.records.push(record.clone());
        if record.is_parked() {
            state
                .active
                .insert(record.license_plate_number().clone(), index);
        }
        debug!(plate = %record.license_plate_number(), lot = %record.parking_lot_name(), "parking record stored");
        Ok(record)
    }

    fn update_parking_record(
        &self,
        record: ParkingRecord,
    ) -> Result<ParkingRecord, RepositoryError> {
        let mut state = self.state()?;
        let index = *state
            .active
            .get(record.license_plate_number())
            .ok_or(RepositoryError::NotFound)?;

        let stored = &state.records[index];
        if stored.parking_lot_name() != record.parking_lot_name()
            || stored.parked_at() != record.parked_at()
        {
            return Err(RepositoryError::NotFound);
        }

        state.records[index] = record.clone();
        if !record.is_parked() {
            state.active.remove(record.license_plate_number());
        }
        debug!(plate = %record.license_plate_number(), lot = %record.parking_lot_name(), "parking record updated");
        Ok(record)
    }

    fn delete_parking_lot(&self, name: &ParkingLotName) -> Result<bool, RepositoryError> {
        let mut state = self.state()?;
        let removed = state.lots.remove(name).is_some();
        if removed {
            debug!(lot = %name, "parking lot deleted");
        }
        Ok(removed)
    }
}
