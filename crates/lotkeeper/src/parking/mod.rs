//! Parking lots, their occupancy, and the park/leave lifecycle of records.

pub mod domain;
pub mod lot;
pub mod ports;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{ParkingLotName, ParkingLotStatus, ParkingRecord, ParkingSpaceCount};
pub use lot::ParkingLot;
pub use ports::{
    ParkingError, ParkingLotCommandUseCase, ParkingLotLoadPort, ParkingLotQueryUseCase,
    ParkingLotSavePort,
};
pub use router::{
    parking_lot_router, CreateParkingLotRequest, ParkingLotResponse, ParkingRecordResponse,
    PlateRequest,
};
pub use service::ParkingLotService;
pub use store::InMemoryParkingStore;
