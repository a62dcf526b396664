use std::sync::Arc;

use super::domain::{Car, CarProperties};
use super::ports::{CarCommandUseCase, CarError, CarLoadPort, CarQueryUseCase, CarSavePort};
use crate::domain::LicensePlateNumber;

pub struct CarService<L, S> {
    load: Arc<L>,
    save: Arc<S>,
}

impl<T> CarService<T, T>
where
    T: CarLoadPort + CarSavePort + 'static,
{
    pub fn from_store(store: Arc<T>) -> Self {
        Self::new(store.clone(), store)
    }
}

impl<L, S> CarService<L, S>
where
    L: CarLoadPort + 'static,
    S: CarSavePort + 'static,
{
    pub fn new(load: Arc<L>, save: Arc<S>) -> Self {
        Self { load, save }
    }
}

impl<L, S> CarCommandUseCase for CarService<L, S>
where
    L: CarLoadPort + 'static,
    S: CarSavePort + 'static,
{
    fn bulk_create_car(&self, commands: Vec<CarProperties>) -> Result<Vec<Car>, CarError> {
        Ok(self.save.save_all(commands)?)
    }
}

impl<L, S> CarQueryUseCase for CarService<L, S>
where
    L: CarLoadPort + 'static,
    S: CarSavePort + 'static,
{
    fn get_by_license_plate_number(&self, plate: &LicensePlateNumber) -> Result<Car, CarError> {
        self.load
            .find_by_license_plate_number(plate)?
            .ok_or_else(|| CarError::NotFound {
                plate: plate.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::store::InMemoryCarStore;
    use crate::repository::RepositoryError;

    fn plate(raw: &str) -> LicensePlateNumber {
        LicensePlateNumber::parse(raw).expect("valid plate")
    }

    struct OfflineCarStore;

    impl CarLoadPort for OfflineCarStore {
        fn find_by_license_plate_number(
            &self,
            _plate: &LicensePlateNumber,
        ) -> Result<Option<Car>, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }
    }

    impl CarSavePort for OfflineCarStore {
        fn save_all(&self, _cars: Vec<CarProperties>) -> Result<Vec<Car>, RepositoryError> {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }
    }

    #[test]
    fn bulk_create_registers_every_car() {
        let service = CarService::from_store(Arc::new(InMemoryCarStore::default()));

        let cars = service
            .bulk_create_car(vec![
                CarProperties::new(plate("12가3456")),
                CarProperties::new(plate("34나5678")),
            ])
            .expect("cars registered");

        assert_eq!(cars.len(), 2);
        assert_ne!(cars[0].id, cars[1].id);
        let stored = service
            .get_by_license_plate_number(&plate("34나5678"))
            .expect("car found");
        assert_eq!(stored, cars[1]);
    }

    #[test]
    fn registering_a_known_plate_returns_the_stored_car() {
        let service = CarService::from_store(Arc::new(InMemoryCarStore::default()));

        let first = service
            .bulk_create_car(vec![CarProperties::new(plate("12가3456"))])
            .expect("registered");
        let second = service
            .bulk_create_car(vec![CarProperties::new(plate("12가3456"))])
            .expect("registered again");

        assert_eq!(first, second);
    }

    #[test]
    fn unknown_plate_is_not_found() {
        let service = CarService::from_store(Arc::new(InMemoryCarStore::default()));

        match service.get_by_license_plate_number(&plate("99다9999")) {
            Err(CarError::NotFound { plate: missing }) => assert_eq!(missing.as_str(), "99다9999"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn storage_failures_propagate() {
        let service = CarService::from_store(Arc::new(OfflineCarStore));

        assert!(matches!(
            service.bulk_create_car(vec![CarProperties::new(plate("12가3456"))]),
            Err(CarError::Repository(RepositoryError::Unavailable(_)))
        ));
        assert!(matches!(
            service.get_by_license_plate_number(&plate("12가3456")),
            Err(CarError::Repository(RepositoryError::Unavailable(_)))
        ));
    }
}
