use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::domain::LicensePlateNumber;
use crate::parking::domain::{ParkingLotName, ParkingRecord, ParkingSpaceCount};
use crate::parking::lot::ParkingLot;
use crate::parking::ports::{ParkingLotLoadPort, ParkingLotSavePort};
use crate::parking::service::ParkingLotService;
use crate::parking::store::InMemoryParkingStore;
use crate::repository::RepositoryError;

pub(super) fn plate(raw: &str) -> LicensePlateNumber {
    LicensePlateNumber::parse(raw).expect("valid plate")
}

pub(super) fn lot_name(raw: &str) -> ParkingLotName {
    ParkingLotName::new(raw).expect("valid lot name")
}

pub(super) fn spaces(value: i64) -> ParkingSpaceCount {
    ParkingSpaceCount::new(value).expect("non-negative count")
}

/// Distinct valid plates: "10가0000", "10가0001", ...
pub(super) fn numbered_plate(index: usize) -> LicensePlateNumber {
    plate(&format!("10가{index:04}"))
}

pub(super) type MemoryService = ParkingLotService<InMemoryParkingStore, InMemoryParkingStore>;

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryParkingStore>) {
    let store = Arc::new(InMemoryParkingStore::default());
    let service = ParkingLotService::from_store(store.clone());
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every call fails as if the database were down.
pub(super) struct UnavailableStore;

impl ParkingLotLoadPort for UnavailableStore {
    fn load_parking_lot(&self, _name: &ParkingLotName) -> Result<Option<ParkingLot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn load_parking_record(
        &self,
        _plate: &LicensePlateNumber,
    ) -> Result<Option<ParkingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn load_parked_cars(
        &self,
        _lot_name: &ParkingLotName,
    ) -> Result<Vec<ParkingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn exists_parking_lot(&self, _name: &ParkingLotName) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ParkingLotSavePort for UnavailableStore {
    fn save_parking_lot(&self, _lot: ParkingLot) -> Result<ParkingLot, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_parking_record(&self, _record: ParkingRecord) -> Result<ParkingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_parking_record(
        &self,
        _record: ParkingRecord,
    ) -> Result<ParkingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_parking_lot(&self, _name: &ParkingLotName) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Load port that reports more active records than the lot holds, to
/// exercise the consistency guard in status computation.
pub(super) struct DesynchronizedStore {
    pub(super) lot: ParkingLot,
    pub(super) active: Vec<ParkingRecord>,
}

impl ParkingLotLoadPort for DesynchronizedStore {
    fn load_parking_lot(&self, name: &ParkingLotName) -> Result<Option<ParkingLot>, RepositoryError> {
        Ok((self.lot.name() == name).then(|| self.lot.clone()))
    }

    fn load_parking_record(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<ParkingRecord>, RepositoryError> {
        Ok(self
            .active
            .iter()
            .find(|record| record.license_plate_number() == plate)
            .cloned())
    }

    fn load_parked_cars(
        &self,
        _lot_name: &ParkingLotName,
    ) -> Result<Vec<ParkingRecord>, RepositoryError> {
        Ok(self.active.clone())
    }

    fn exists_parking_lot(&self, name: &ParkingLotName) -> Result<bool, RepositoryError> {
        Ok(self.lot.name() == name)
    }
}

/// Records which mutating calls reached the save port.
#[derive(Default)]
pub(super) struct RecordingSavePort {
    pub(super) calls: std::sync::Mutex<Vec<&'static str>>,
}

impl RecordingSavePort {
    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

impl ParkingLotSavePort for RecordingSavePort {
    fn save_parking_lot(&self, lot: ParkingLot) -> Result<ParkingLot, RepositoryError> {
        self.record("save_parking_lot");
        Ok(lot)
    }

    fn save_parking_record(&self, record: ParkingRecord) -> Result<ParkingRecord, RepositoryError> {
        self.record("save_parking_record");
        Ok(record)
    }

    fn update_parking_record(
        &self,
        record: ParkingRecord,
    ) -> Result<ParkingRecord, RepositoryError> {
        self.record("update_parking_record");
        Ok(record)
    }

    fn delete_parking_lot(&self, _name: &ParkingLotName) -> Result<bool, RepositoryError> {
        self.record("delete_parking_lot");
        Ok(true)
    }
}
