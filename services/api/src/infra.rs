use lotkeeper::car::{CarService, InMemoryCarStore};
use lotkeeper::config::SeedLot;
use lotkeeper::domain::DomainError;
use lotkeeper::error::AppError;
use lotkeeper::integrated::IntegratedParkingService;
use lotkeeper::parking::{
    InMemoryParkingStore, ParkingError, ParkingLotCommandUseCase, ParkingLotName,
    ParkingLotService, ParkingSpaceCount,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) type ParkingServiceImpl = ParkingLotService<InMemoryParkingStore, InMemoryParkingStore>;
pub(crate) type CarServiceImpl = CarService<InMemoryCarStore, InMemoryCarStore>;
pub(crate) type IntegratedServiceImpl = IntegratedParkingService<ParkingServiceImpl, CarServiceImpl>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Use-case services wired over the in-memory stores.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) parking: Arc<ParkingServiceImpl>,
    pub(crate) cars: Arc<CarServiceImpl>,
    pub(crate) integrated: Arc<IntegratedServiceImpl>,
}

impl Services {
    pub(crate) fn in_memory() -> Self {
        let parking = Arc::new(ParkingLotService::from_store(Arc::new(
            InMemoryParkingStore::default(),
        )));
        let cars = Arc::new(CarService::from_store(Arc::new(InMemoryCarStore::default())));
        let integrated = Arc::new(IntegratedParkingService::new(parking.clone(), cars.clone()));
        Self {
            parking,
            cars,
            integrated,
        }
    }
}

/// Create the configured lots. Repeated names are skipped; any other failure
/// aborts startup.
pub(crate) fn seed_parking_lots<S>(service: &S, seeds: &[SeedLot]) -> Result<usize, AppError>
where
    S: ParkingLotCommandUseCase,
{
    let mut created = 0;
    for seed in seeds {
        let name = ParkingLotName::new(seed.name.clone())?;
        let total_spaces = ParkingSpaceCount::new(seed.total_spaces)?;
        match service.create_parking_lot(name, total_spaces) {
            Ok(lot) => {
                info!(lot = %lot.name(), total_spaces = %lot.total_spaces(), "seeded parking lot");
                created += 1;
            }
            Err(ParkingError::Domain(DomainError::AlreadyExists { name })) => {
                warn!(lot = %name, "duplicate seed entry skipped");
            }
            Err(error) => return Err(error.into()),
        }
    }
    Ok(created)
}
