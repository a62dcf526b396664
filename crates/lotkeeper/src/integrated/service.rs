use std::sync::Arc;

use crate::car::{Car, CarCommandUseCase, CarError, CarProperties, CarQueryUseCase};
use crate::domain::{DomainError, LicensePlateNumber};
use crate::parking::{
    ParkingError, ParkingLot, ParkingLotCommandUseCase, ParkingLotName, ParkingLotQueryUseCase,
    ParkingRecord, ParkingSpaceCount,
};

/// Registration request for the combined register-and-park flow. `model` and
/// `color` are accepted for the caller's benefit but not persisted.
#[derive(Debug, Clone)]
pub struct RegisterAndPark {
    pub license_plate_number: LicensePlateNumber,
    pub model: String,
    pub color: String,
    pub parking_lot_name: ParkingLotName,
    pub total_spaces: ParkingSpaceCount,
}

#[derive(Debug, Clone)]
pub struct IntegratedParkingResult {
    pub car: Car,
    pub parking_record: ParkingRecord,
    /// Present when the lot did not exist and was created by this call.
    pub parking_lot: Option<ParkingLot>,
}

#[derive(Debug, Clone)]
pub struct IntegratedLeavingResult {
    pub car: Car,
    pub parking_record: ParkingRecord,
}

#[derive(Debug, Clone)]
pub struct RegisteredCarInParkingLot {
    pub car: Car,
    pub parking_record: ParkingRecord,
}

/// Facade composing the car and parking-lot use cases.
pub struct IntegratedParkingService<P, C> {
    parking: Arc<P>,
    cars: Arc<C>,
}

impl<P, C> IntegratedParkingService<P, C>
where
    P: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
    C: CarCommandUseCase + CarQueryUseCase + 'static,
{
    pub fn new(parking: Arc<P>, cars: Arc<C>) -> Self {
        Self { parking, cars }
    }

    pub fn register_car_and_park(
        &self,
        request: RegisterAndPark,
    ) -> Result<IntegratedParkingResult, IntegratedParkingError> {
        let RegisterAndPark {
            license_plate_number,
            parking_lot_name,
            total_spaces,
            ..
        } = request;

        let car = self
            .cars
            .bulk_create_car(vec![CarProperties::new(license_plate_number.clone())])?
            .into_iter()
            .next()
            .ok_or_else(|| CarError::NotFound {
                plate: license_plate_number.clone(),
            })?;

        let parking_lot = self.ensure_parking_lot(&parking_lot_name, total_spaces)?;
        let parking_record = self
            .parking
            .park_car(&parking_lot_name, &license_plate_number)?;

        Ok(IntegratedParkingResult {
            car,
            parking_record,
            parking_lot,
        })
    }

    pub fn leave_and_unregister_car(
        &self,
        plate: &LicensePlateNumber,
    ) -> Result<IntegratedLeavingResult, IntegratedParkingError> {
        let parking_record = self.parking.leave_car(plate)?;
        // cars have no removal operation, so unregistering only confirms the car
        let car = self.cars.get_by_license_plate_number(plate)?;
        Ok(IntegratedLeavingResult {
            car,
            parking_record,
        })
    }

    /// Active records of the lot joined with their car; unregistered plates
    /// are skipped.
    pub fn registered_cars_in_parking_lot(
        &self,
        lot_name: &ParkingLotName,
    ) -> Result<Vec<RegisteredCarInParkingLot>, IntegratedParkingError> {
        let mut registered = Vec::new();
        for parking_record in self.parking.get_parked_cars(lot_name)? {
            match self
                .cars
                .get_by_license_plate_number(parking_record.license_plate_number())
            {
                Ok(car) => registered.push(RegisteredCarInParkingLot {
                    car,
                    parking_record,
                }),
                Err(CarError::NotFound { .. }) => continue,
                Err(other) => return Err(other.into()),
            }
        }
        Ok(registered)
    }

    fn ensure_parking_lot(
        &self,
        name: &ParkingLotName,
        total_spaces: ParkingSpaceCount,
    ) -> Result<Option<ParkingLot>, IntegratedParkingError> {
        match self.parking.get_parking_lot_status(name) {
            Ok(_) => Ok(None),
            Err(ParkingError::Domain(DomainError::NotFound { .. })) => {
                match self.parking.create_parking_lot(name.clone(), total_spaces) {
                    Ok(lot) => Ok(Some(lot)),
                    // lost a creation race; the lot exists now
                    Err(ParkingError::Domain(DomainError::AlreadyExists { .. })) => Ok(None),
                    Err(other) => Err(other.into()),
                }
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegratedParkingError {
    #[error(transparent)]
    Parking(#[from] ParkingError),
    #[error(transparent)]
    Car(#[from] CarError),
}
