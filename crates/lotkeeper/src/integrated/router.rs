use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::service::{
    IntegratedLeavingResult, IntegratedParkingError, IntegratedParkingResult,
    IntegratedParkingService, RegisterAndPark, RegisteredCarInParkingLot,
};
use crate::car::router::car_error_response;
use crate::car::{CarCommandUseCase, CarQueryUseCase};
use crate::domain::{DomainError, LicensePlateNumber};
use crate::http::{domain_status, error_response};
use crate::parking::router::parking_error_response;
use crate::parking::{
    ParkingLotCommandUseCase, ParkingLotName, ParkingLotQueryUseCase, ParkingSpaceCount,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAndParkRequest {
    pub license_plate_number: String,
    pub model: String,
    pub color: String,
    pub parking_lot_name: String,
    pub total_spaces: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveAndUnregisterRequest {
    pub license_plate_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegratedParkingResponse {
    pub license_plate_number: String,
    pub parking_lot_name: String,
    pub parked_at: DateTime<Utc>,
    pub is_parked: bool,
    pub parking_lot_created: bool,
}

impl From<&IntegratedParkingResult> for IntegratedParkingResponse {
    fn from(result: &IntegratedParkingResult) -> Self {
        Self {
            license_plate_number: result.car.license_plate_number.to_string(),
            parking_lot_name: result.parking_record.parking_lot_name().to_string(),
            parked_at: result.parking_record.parked_at(),
            is_parked: result.parking_record.is_parked(),
            parking_lot_created: result.parking_lot.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegratedLeavingResponse {
    pub license_plate_number: String,
    pub left_at: Option<DateTime<Utc>>,
    pub is_parked: bool,
}

impl From<&IntegratedLeavingResult> for IntegratedLeavingResponse {
    fn from(result: &IntegratedLeavingResult) -> Self {
        Self {
            license_plate_number: result.car.license_plate_number.to_string(),
            left_at: result.parking_record.left_at(),
            is_parked: result.parking_record.is_parked(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredCarResponse {
    pub license_plate_number: String,
    pub parking_lot_name: String,
    pub parked_at: DateTime<Utc>,
    pub car_created_at: DateTime<Utc>,
}

impl From<&RegisteredCarInParkingLot> for RegisteredCarResponse {
    fn from(registered: &RegisteredCarInParkingLot) -> Self {
        Self {
            license_plate_number: registered.car.license_plate_number.to_string(),
            parking_lot_name: registered.parking_record.parking_lot_name().to_string(),
            parked_at: registered.parking_record.parked_at(),
            car_created_at: registered.car.created_at,
        }
    }
}

pub fn integrated_router<P, C>(service: Arc<IntegratedParkingService<P, C>>) -> Router
where
    P: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
    C: CarCommandUseCase + CarQueryUseCase + 'static,
{
    Router::new()
        .route(
            "/api/integrated/register-and-park",
            post(register_and_park_handler::<P, C>),
        )
        .route(
            "/api/integrated/leave-and-unregister",
            post(leave_and_unregister_handler::<P, C>),
        )
        .route(
            "/api/integrated/parking-lots/:name/registered-cars",
            get(registered_cars_handler::<P, C>),
        )
        .with_state(service)
}

fn integrated_error_response(error: &IntegratedParkingError) -> Response {
    match error {
        IntegratedParkingError::Parking(parking) => parking_error_response(parking),
        IntegratedParkingError::Car(car) => car_error_response(car),
    }
}

fn invalid_input(error: DomainError) -> Response {
    error_response(domain_status(&error), error.to_string())
}

fn parse_register_request(request: RegisterAndParkRequest) -> Result<RegisterAndPark, Response> {
    let license_plate_number =
        LicensePlateNumber::parse(request.license_plate_number).map_err(invalid_input)?;
    if request.model.trim().is_empty() || request.color.trim().is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "model and color must not be blank",
        ));
    }
    let parking_lot_name = ParkingLotName::new(request.parking_lot_name).map_err(invalid_input)?;
    if request.total_spaces < 1 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "totalSpaces must be at least 1",
        ));
    }
    let total_spaces = ParkingSpaceCount::new(request.total_spaces).map_err(invalid_input)?;

    Ok(RegisterAndPark {
        license_plate_number,
        model: request.model,
        color: request.color,
        parking_lot_name,
        total_spaces,
    })
}

pub(crate) async fn register_and_park_handler<P, C>(
    State(service): State<Arc<IntegratedParkingService<P, C>>>,
    axum::Json(request): axum::Json<RegisterAndParkRequest>,
) -> Response
where
    P: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
    C: CarCommandUseCase + CarQueryUseCase + 'static,
{
    let command = match parse_register_request(request) {
        Ok(command) => command,
        Err(response) => return response,
    };

    match service.register_car_and_park(command) {
        Ok(result) => {
            info!(
                plate = %result.car.license_plate_number,
                lot = %result.parking_record.parking_lot_name(),
                lot_created = result.parking_lot.is_some(),
                "car registered and parked"
            );
            (
                StatusCode::CREATED,
                axum::Json(IntegratedParkingResponse::from(&result)),
            )
                .into_response()
        }
        Err(error) => integrated_error_response(&error),
    }
}

pub(crate) async fn leave_and_unregister_handler<P, C>(
    State(service): State<Arc<IntegratedParkingService<P, C>>>,
    axum::Json(request): axum::Json<LeaveAndUnregisterRequest>,
) -> Response
where
    P: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
    C: CarCommandUseCase + CarQueryUseCase + 'static,
{
    let plate = match LicensePlateNumber::parse(request.license_plate_number) {
        Ok(plate) => plate,
        Err(error) => return invalid_input(error),
    };

    match service.leave_and_unregister_car(&plate) {
        Ok(result) => (
            StatusCode::OK,
            axum::Json(IntegratedLeavingResponse::from(&result)),
        )
            .into_response(),
        Err(error) => integrated_error_response(&error),
    }
}

pub(crate) async fn registered_cars_handler<P, C>(
    State(service): State<Arc<IntegratedParkingService<P, C>>>,
    Path(name): Path<String>,
) -> Response
where
    P: ParkingLotCommandUseCase + ParkingLotQueryUseCase + 'static,
    C: CarCommandUseCase + CarQueryUseCase + 'static,
{
    let name = match ParkingLotName::new(name) {
        Ok(name) => name,
        Err(error) => return invalid_input(error),
    };

    match service.registered_cars_in_parking_lot(&name) {
        Ok(registered) => {
            let body: Vec<RegisteredCarResponse> =
                registered.iter().map(RegisteredCarResponse::from).collect();
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => integrated_error_response(&error),
    }
}
