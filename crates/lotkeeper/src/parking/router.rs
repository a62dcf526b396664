use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{ParkingLotName, ParkingLotStatus, ParkingRecord, ParkingSpaceCount};
use super::ports::{ParkingError, ParkingLotCommandUseCase, ParkingLotQueryUseCase};
use crate::domain::{DomainError, LicensePlateNumber};
use crate::http::{domain_status, error_response, repository_status};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingLotRequest {
    pub name: String,
    pub total_spaces: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateRequest {
    pub license_plate_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLotResponse {
    pub name: String,
    pub total_spaces: u64,
    pub available_spaces: u64,
    pub occupied_spaces: u64,
    pub occupancy_rate: f64,
    pub occupancy_percentage: u32,
    pub is_full: bool,
    pub is_empty: bool,
}

impl From<&ParkingLotStatus> for ParkingLotResponse {
    fn from(status: &ParkingLotStatus) -> Self {
        Self {
            name: status.name().to_string(),
            total_spaces: status.total_spaces().value(),
            available_spaces: status.available_spaces().value(),
            occupied_spaces: status.occupied_spaces().value(),
            occupancy_rate: status.occupancy_rate(),
            occupancy_percentage: status.occupancy_percentage(),
            is_full: status.is_full(),
            is_empty: status.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingRecordResponse {
    pub license_plate_number: String,
    pub parking_lot_name: String,
    pub parked_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    pub is_parked: bool,
    pub parking_duration_seconds: i64,
}

impl From<&ParkingRecord> for ParkingRecordResponse {
    fn from(record: &ParkingRecord) -> Self {
        Self {
            license_plate_number: record.license_plate_number().to_string(),
            parking_lot_name: record.parking_lot_name().to_string(),
            parked_at: record.parked_at(),
            left_at: record.left_at(),
            is_parked: record.is_parked(),
            parking_duration_seconds: record.parking_duration(Utc::now()).num_seconds(),
        }
    }
}

/// HTTP adapter over the parking-lot command and query use cases.
pub fn parking_lot_router<S>(service: Arc<S>) -> Router
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    Router::new()
        .route("/api/parking-lots", post(create_handler::<S>))
        .route("/api/parking-lots/leave", post(leave_handler::<S>))
        .route(
            "/api/parking-lots/:name",
            get(status_handler::<S>).delete(delete_handler::<S>),
        )
        .route("/api/parking-lots/:name/cars", get(parked_cars_handler::<S>))
        .route("/api/parking-lots/:name/park", post(park_handler::<S>))
        .route(
            "/api/parking-records/:license_plate_number",
            get(record_handler::<S>),
        )
        .with_state(service)
}

pub(crate) fn parking_error_response(error: &ParkingError) -> Response {
    let status = match error {
        ParkingError::Domain(domain) => domain_status(domain),
        ParkingError::Repository(repository) => repository_status(repository),
    };
    if status.is_server_error() {
        warn!(%error, "parking request failed");
    }
    error_response(status, error.to_string())
}

fn invalid_input(error: DomainError) -> Response {
    error_response(domain_status(&error), error.to_string())
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<S>>,
    axum::Json(request): axum::Json<CreateParkingLotRequest>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let name = match ParkingLotName::new(request.name) {
        Ok(name) => name,
        Err(error) => return invalid_input(error),
    };
    if request.total_spaces < 1 {
        return error_response(StatusCode::BAD_REQUEST, "totalSpaces must be at least 1");
    }
    let total_spaces = match ParkingSpaceCount::new(request.total_spaces) {
        Ok(total) => total,
        Err(error) => return invalid_input(error),
    };

    let created = service
        .create_parking_lot(name, total_spaces)
        .and_then(|lot| service.get_parking_lot_status(lot.name()));
    match created {
        Ok(status) => {
            info!(lot = %status.name(), total_spaces = %status.total_spaces(), "parking lot created");
            (StatusCode::CREATED, axum::Json(ParkingLotResponse::from(&status))).into_response()
        }
        Err(error) => parking_error_response(&error),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<S>>,
    Path(name): Path<String>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let name = match ParkingLotName::new(name) {
        Ok(name) => name,
        Err(error) => return invalid_input(error),
    };

    match service.get_parking_lot_status(&name) {
        Ok(status) => (StatusCode::OK, axum::Json(ParkingLotResponse::from(&status))).into_response(),
        Err(error) => parking_error_response(&error),
    }
}

pub(crate) async fn parked_cars_handler<S>(
    State(service): State<Arc<S>>,
    Path(name): Path<String>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let name = match ParkingLotName::new(name) {
        Ok(name) => name,
        Err(error) => return invalid_input(error),
    };

    match service.get_parked_cars(&name) {
        Ok(records) => {
            let body: Vec<ParkingRecordResponse> =
                records.iter().map(ParkingRecordResponse::from).collect();
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => parking_error_response(&error),
    }
}

pub(crate) async fn park_handler<S>(
    State(service): State<Arc<S>>,
    Path(name): Path<String>,
    axum::Json(request): axum::Json<PlateRequest>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let name = match ParkingLotName::new(name) {
        Ok(name) => name,
        Err(error) => return invalid_input(error),
    };
    let plate = match LicensePlateNumber::parse(request.license_plate_number) {
        Ok(plate) => plate,
        Err(error) => return invalid_input(error),
    };

    match service.park_car(&name, &plate) {
        Ok(record) => {
            info!(lot = %name, %plate, "vehicle parked");
            (StatusCode::OK, axum::Json(ParkingRecordResponse::from(&record))).into_response()
        }
        Err(error) => parking_error_response(&error),
    }
}

pub(crate) async fn leave_handler<S>(
    State(service): State<Arc<S>>,
    axum::Json(request): axum::Json<PlateRequest>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let plate = match LicensePlateNumber::parse(request.license_plate_number) {
        Ok(plate) => plate,
        Err(error) => return invalid_input(error),
    };

    match service.leave_car(&plate) {
        Ok(record) => {
            info!(lot = %record.parking_lot_name(), %plate, "vehicle left");
            (StatusCode::OK, axum::Json(ParkingRecordResponse::from(&record))).into_response()
        }
        Err(error) => parking_error_response(&error),
    }
}

pub(crate) async fn record_handler<S>(
    State(service): State<Arc<S>>,
    Path(license_plate_number): Path<String>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let plate = match LicensePlateNumber::parse(license_plate_number) {
        Ok(plate) => plate,
        Err(error) => return invalid_input(error),
    };

    match service.find_parking_record(&plate) {
        Ok(Some(record)) => {
            (StatusCode::OK, axum::Json(ParkingRecordResponse::from(&record))).into_response()
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("no active parking record for {plate}"),
        ),
        Err(error) => parking_error_response(&error),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<S>>,
    Path(name): Path<String>,
) -> Response
where
    S: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
{
    let name = match ParkingLotName::new(name) {
        Ok(name) => name,
        Err(error) => return invalid_input(error),
    };

    match service.delete_parking_lot(&name) {
        Ok(()) => {
            info!(lot = %name, "parking lot deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => parking_error_response(&error),
    }
}
