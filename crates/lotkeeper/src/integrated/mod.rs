//! Car registration and parking combined into single calls.

pub mod router;
pub mod service;


pub use router::{
    integrated_router, IntegratedLeavingResponse, IntegratedParkingResponse,
    LeaveAndUnregisterRequest, RegisterAndParkRequest, RegisteredCarResponse,
};
pub use service::{
    IntegratedLeavingResult, IntegratedParkingError, IntegratedParkingResult,
    IntegratedParkingService, RegisterAndPark, RegisteredCarInParkingLot,
};
