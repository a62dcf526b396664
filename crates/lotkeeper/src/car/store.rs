use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use super::domain::{Car, CarProperties};
use super::ports::{CarLoadPort, CarSavePort};
use crate::domain::LicensePlateNumber;
use crate::repository::RepositoryError;

/// Car registry keyed by plate.
#[derive(Default)]
pub struct InMemoryCarStore {
    cars: Mutex<HashMap<LicensePlateNumber, Car>>,
}

impl InMemoryCarStore {
    fn cars(&self) -> Result<MutexGuard<'_, HashMap<LicensePlateNumber, Car>>, RepositoryError> {
        self.cars
            .lock()
            .map_err(|_| RepositoryError::Unavailable("car store mutex poisoned".to_string()))
    }
}

impl CarLoadPort for InMemoryCarStore {
    fn find_by_license_plate_number(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<Option<Car>, RepositoryError> {
        Ok(self.cars()?.get(plate).cloned())
    }
}

impl CarSavePort for InMemoryCarStore {
    fn save_all(&self, cars: Vec<CarProperties>) -> Result<Vec<Car>, RepositoryError> {
        let mut registry = self.cars()?;
        let now = Utc::now();

        let saved = cars
            .into_iter()
            .map(|properties| {
                registry
                    .entry(properties.license_plate_number.clone())
                    .or_insert_with(|| {
                        debug!(plate = %properties.license_plate_number, "car registered");
                        Car::register(properties, now)
                    })
                    .clone()
            })
            .collect();
        Ok(saved)
    }
}
