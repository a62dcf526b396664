//! Registered vehicles, keyed by license plate.

pub mod domain;
pub mod ports;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{Car, CarId, CarProperties};
pub use ports::{CarCommandUseCase, CarError, CarLoadPort, CarQueryUseCase, CarSavePort};
pub use router::{car_router, CarRequest};
pub use service::CarService;
pub use store::InMemoryCarStore;
