use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::domain::{
    check_admission, ParkingLotName, ParkingLotStatus, ParkingRecord, ParkingSpaceCount,
};
use super::lot::ParkingLot;
use super::ports::{
    ParkingError, ParkingLotCommandUseCase, ParkingLotLoadPort, ParkingLotQueryUseCase,
    ParkingLotSavePort,
};
use crate::domain::{DomainError, LicensePlateNumber};
use crate::repository::RepositoryError;

/// Store-backed parking orchestration. Canonical owner of the admission
/// invariants; the in-memory [`ParkingLot`] aggregate shares the same rule.
///
/// Every mutation of a lot runs while that lot's lock is held, so the
/// existence, duplicate and capacity checks observe the state the write
/// lands on. A plate racing into two different lots is caught by the
/// store's one-active-record-per-plate constraint.
pub struct ParkingLotService<L, S> {
    load: Arc<L>,
    save: Arc<S>,
    locks: LotLocks,
}

impl<T> ParkingLotService<T, T>
where
    T: ParkingLotLoadPort + ParkingLotSavePort + 'static,
{
    pub fn from_store(store: Arc<T>) -> Self {
        Self::new(store.clone(), store)
    }
}

impl<L, S> ParkingLotService<L, S>
where
    L: ParkingLotLoadPort + 'static,
    S: ParkingLotSavePort + 'static,
{
    pub fn new(load: Arc<L>, save: Arc<S>) -> Self {
        Self {
            load,
            save,
            locks: LotLocks::default(),
        }
    }

    /// Lot names that currently have a lock entry.
    pub fn tracked_lock_count(&self) -> usize {
        self.locks.len()
    }

    fn require_lot(&self, name: &ParkingLotName) -> Result<ParkingLot, ParkingError> {
        let lot = self
            .load
            .load_parking_lot(name)?
            .ok_or_else(|| DomainError::NotFound {
                name: name.to_string(),
            })?;
        Ok(lot)
    }
}

impl<L, S> ParkingLotCommandUseCase for ParkingLotService<L, S>
where
    L: ParkingLotLoadPort + 'static,
    S: ParkingLotSavePort + 'static,
{
    fn create_parking_lot(
        &self,
        name: ParkingLotName,
        total_spaces: ParkingSpaceCount,
    ) -> Result<ParkingLot, ParkingError> {
        let lock = self.locks.for_lot(&name);
        let _guard = lock.acquire();

        if self.load.exists_parking_lot(&name)? {
            return Err(DomainError::AlreadyExists {
                name: name.to_string(),
            }
            .into());
        }

        let lot = ParkingLot::new(name.clone(), total_spaces);
        self.save.save_parking_lot(lot).map_err(|error| match error {
            RepositoryError::Conflict => ParkingError::Domain(DomainError::AlreadyExists {
                name: name.to_string(),
            }),
            other => ParkingError::Repository(other),
        })
    }

    fn park_car(
        &self,
        lot_name: &ParkingLotName,
        plate: &LicensePlateNumber,
    ) -> Result<ParkingRecord, ParkingError> {
        let lock = self.locks.for_lot(lot_name);
        let _guard = lock.acquire();

        let lot = self.require_lot(lot_name)?;
        let already_parked = self
            .load
            .load_parking_record(plate)?
            .is_some_and(|record| record.is_parked());
        let occupied = ParkingSpaceCount::from_count(self.load.load_parked_cars(lot_name)?.len());
        check_admission(
            lot_name,
            plate,
            lot.total_spaces(),
            occupied,
            already_parked,
        )?;

        let record = ParkingRecord::park(plate.clone(), lot_name.clone(), Utc::now());
        self.save.save_parking_record(record).map_err(|error| match error {
            RepositoryError::Conflict => ParkingError::Domain(DomainError::AlreadyParked {
                plate: plate.clone(),
            }),
            other => ParkingError::Repository(other),
        })
    }

    fn leave_car(&self, plate: &LicensePlateNumber) -> Result<ParkingRecord, ParkingError> {
        let not_parked = || DomainError::NotParked {
            plate: plate.clone(),
        };

        let located = self.load.load_parking_record(plate)?.ok_or_else(not_parked)?;
        let lock = self.locks.for_lot(located.parking_lot_name());
        let _guard = lock.acquire();

        // re-read under the lot lock; a concurrent leave may have closed it
        let record = self
            .load
            .load_parking_record(plate)?
            .filter(|record| record.parking_lot_name() == located.parking_lot_name())
            .ok_or_else(not_parked)?;
        if !record.is_parked() {
            return Err(not_parked().into());
        }

        let left = record.leave()?;
        Ok(self.save.update_parking_record(left)?)
    }

    fn delete_parking_lot(&self, name: &ParkingLotName) -> Result<(), ParkingError> {
        let lock = self.locks.for_lot(name);
        let _guard = lock.acquire();

        self.require_lot(name)?;
        if !self.load.load_parked_cars(name)?.is_empty() {
            return Err(DomainError::LotNotEmpty {
                name: name.to_string(),
            }
            .into());
        }

        if self.save.delete_parking_lot(name)? {
            Ok(())
        } else {
            Err(DomainError::NotFound {
                name: name.to_string(),
            }
            .into())
        }
    }
}

impl<L, S> ParkingLotQueryUseCase for ParkingLotService<L, S>
where
    L: ParkingLotLoadPort + 'static,
    S: ParkingLotSavePort + 'static,
{
    fn get_parking_lot_status(&self, name: &ParkingLotName) -> Result<ParkingLotStatus, ParkingError> {
        let lot = self.require_lot(name)?;
        let parked = self.load.load_parked_cars(name)?;
        let status = ParkingLotStatus::from_counts(
            name.clone(),
            lot.total_spaces(),
            ParkingSpaceCount::from_count(parked.len()),
        )?;
        Ok(status)
    }

    fn get_parked_cars(&self, name: &ParkingLotName) -> Result<Vec<ParkingRecord>, ParkingError> {
        Ok(self.load.load_parked_cars(name)?)
    }

    fn find_parking_record(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<ParkingRecord>, ParkingError> {
        Ok(self.load.load_parking_record(plate)?)
    }
}

/// One exclusivity domain per lot name; different lots never contend.
///
/// Entries live only while some operation holds a [`LotLock`] for the name,
/// so names that never resolve to a lot do not accumulate.
#[derive(Default)]
struct LotLocks {
    registry: Mutex<HashMap<ParkingLotName, Arc<Mutex<()>>>>,
}

impl LotLocks {
    fn registry(&self) -> MutexGuard<'_, HashMap<ParkingLotName, Arc<Mutex<()>>>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn for_lot(&self, name: &ParkingLotName) -> LotLock<'_> {
        let lock = self.registry().entry(name.clone()).or_default().clone();
        LotLock {
            locks: self,
            name: name.clone(),
            lock,
        }
    }

    fn len(&self) -> usize {
        self.registry().len()
    }
}

/// Handle on one lot's lock; dropping the last handle removes the entry.
struct LotLock<'a> {
    locks: &'a LotLocks,
    name: ParkingLotName,
    lock: Arc<Mutex<()>>,
}

impl LotLock<'_> {
    // The guarded value is `()`, so a poisoned lock carries no torn state.
    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LotLock<'_> {
    fn drop(&mut self) {
        let mut registry = self.locks.registry();
        // handles are only cloned under the registry mutex: two strong
        // references means the registry and this handle
        if Arc::strong_count(&self.lock) == 2 {
            registry.remove(&self.name);
        }
    }
}
