use super::domain::{Car, CarProperties};
use crate::domain::{DomainError, LicensePlateNumber};
use crate::repository::RepositoryError;

pub trait CarLoadPort: Send + Sync {
    fn find_by_license_plate_number(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<Car>, RepositoryError>;
}

pub trait CarSavePort: Send + Sync {
    /// Registers every car; a plate that is already registered yields the
    /// stored car instead of a duplicate.
    fn save_all(&self, cars: Vec<CarProperties>) -> Result<Vec<Car>, RepositoryError>;
}

pub trait CarCommandUseCase: Send + Sync {
    fn bulk_create_car(&self, commands: Vec<CarProperties>) -> Result<Vec<Car>, CarError>;
}

pub trait CarQueryUseCase: Send + Sync {
    fn get_by_license_plate_number(&self, plate: &LicensePlateNumber) -> Result<Car, CarError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CarError {
    #[error("car is not registered: {plate}")]
    NotFound { plate: LicensePlateNumber },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
