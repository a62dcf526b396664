//! Outbound storage ports and inbound use-case ports for parking lots.

use super::domain::{ParkingLotName, ParkingLotStatus, ParkingRecord, ParkingSpaceCount};
use super::lot::ParkingLot;
use crate::domain::{DomainError, LicensePlateNumber};
use crate::repository::RepositoryError;

/// Read side of the lot and record stores.
pub trait ParkingLotLoadPort: Send + Sync {
    fn load_parking_lot(&self, name: &ParkingLotName) -> Result<Option<ParkingLot>, RepositoryError>;
    /// Active record for the plate only; closed records are never returned.
    fn load_parking_record(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<ParkingRecord>, RepositoryError>;
    /// Active records of the lot only.
    fn load_parked_cars(&self, lot_name: &ParkingLotName)
        -> Result<Vec<ParkingRecord>, RepositoryError>;
    fn exists_parking_lot(&self, name: &ParkingLotName) -> Result<bool, RepositoryError>;
}

/// Write side of the lot and record stores.
///
/// Implementations enforce a unique lot name and at most one active record
/// per plate, answering violations with [`RepositoryError::Conflict`].
pub trait ParkingLotSavePort: Send + Sync {
    fn save_parking_lot(&self, lot: ParkingLot) -> Result<ParkingLot, RepositoryError>;
    fn save_parking_record(&self, record: ParkingRecord) -> Result<ParkingRecord, RepositoryError>;
    /// Persist a closed record over its active counterpart.
    fn update_parking_record(&self, record: ParkingRecord)
        -> Result<ParkingRecord, RepositoryError>;
    fn delete_parking_lot(&self, name: &ParkingLotName) -> Result<bool, RepositoryError>;
}

pub trait ParkingLotCommandUseCase: Send + Sync {
    fn create_parking_lot(
        &self,
        name: ParkingLotName,
        total_spaces: ParkingSpaceCount,
    ) -> Result<ParkingLot, ParkingError>;
    fn park_car(
        &self,
        lot_name: &ParkingLotName,
        plate: &LicensePlateNumber,
    ) -> Result<ParkingRecord, ParkingError>;
    fn leave_car(&self, plate: &LicensePlateNumber) -> Result<ParkingRecord, ParkingError>;
    fn delete_parking_lot(&self, name: &ParkingLotName) -> Result<(), ParkingError>;
}

pub trait ParkingLotQueryUseCase: Send + Sync {
    fn get_parking_lot_status(&self, name: &ParkingLotName)
        -> Result<ParkingLotStatus, ParkingError>;
    fn get_parked_cars(&self, name: &ParkingLotName) -> Result<Vec<ParkingRecord>, ParkingError>;
    fn find_parking_record(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<ParkingRecord>, ParkingError>;
}

/// Error surfaced by the parking-lot use cases.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParkingError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ParkingError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ParkingError::Domain(error) => Some(error),
            ParkingError::Repository(_) => None,
        }
    }
}
