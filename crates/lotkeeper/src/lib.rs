//! Parking-lot management: lots with fixed capacity, park/leave records,
//! registered cars, and the HTTP adapters that expose them.

pub mod car;
pub mod config;
pub mod domain;
pub mod error;
mod http;
pub mod integrated;
pub mod parking;
pub mod repository;
pub mod telemetry;

pub use domain::{DomainError, LicensePlateNumber};
pub use repository::RepositoryError;
