use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::CarProperties;
use super::ports::{CarCommandUseCase, CarError, CarQueryUseCase};
use crate::domain::LicensePlateNumber;
use crate::http::{domain_status, error_response, repository_status};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
    pub license_plate_number: String,
}

pub fn car_router<S>(service: Arc<S>) -> Router
where
    S: CarCommandUseCase + CarQueryUseCase + 'static,
{
    Router::new()
        .route("/api/cars/bulk", post(bulk_create_handler::<S>))
        .route("/api/cars/:license_plate_number", get(car_handler::<S>))
        .with_state(service)
}

pub(crate) fn car_error_response(error: &CarError) -> Response {
    let status = match error {
        CarError::NotFound { .. } => StatusCode::NOT_FOUND,
        CarError::Domain(domain) => domain_status(domain),
        CarError::Repository(repository) => repository_status(repository),
    };
    if status.is_server_error() {
        warn!(%error, "car request failed");
    }
    error_response(status, error.to_string())
}

pub(crate) async fn bulk_create_handler<S>(
    State(service): State<Arc<S>>,
    axum::Json(requests): axum::Json<Vec<CarRequest>>,
) -> Response
where
    S: CarCommandUseCase + CarQueryUseCase + 'static,
{
    let properties: Result<Vec<CarProperties>, _> = requests
        .into_iter()
        .map(|request| LicensePlateNumber::parse(request.license_plate_number).map(CarProperties::new))
        .collect();
    let properties = match properties {
        Ok(properties) => properties,
        Err(error) => return error_response(domain_status(&error), error.to_string()),
    };

    match service.bulk_create_car(properties) {
        Ok(cars) => {
            info!(count = cars.len(), "cars registered");
            (StatusCode::CREATED, axum::Json(cars)).into_response()
        }
        Err(error) => car_error_response(&error),
    }
}

pub(crate) async fn car_handler<S>(
    State(service): State<Arc<S>>,
    Path(license_plate_number): Path<String>,
) -> Response
where
    S: CarCommandUseCase + CarQueryUseCase + 'static,
{
    let plate = match LicensePlateNumber::parse(license_plate_number) {
        Ok(plate) => plate,
        Err(error) => return error_response(domain_status(&error), error.to_string()),
    };

    match service.get_by_license_plate_number(&plate) {
        Ok(car) => (StatusCode::OK, axum::Json(car)).into_response(),
        Err(error) => car_error_response(&error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::service::CarService;
    use crate::car::store::InMemoryCarStore;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        car_router(Arc::new(CarService::from_store(Arc::new(
            InMemoryCarStore::default(),
        ))))
    }

    async fn json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn bulk_request(plates: &[&str]) -> Request<Body> {
        let payload: Vec<CarRequest> = plates
            .iter()
            .map(|plate| CarRequest {
                license_plate_number: plate.to_string(),
            })
            .collect();
        Request::post("/api/cars/bulk")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
            .expect("request")
    }

    #[tokio::test]
    async fn bulk_route_registers_cars() {
        let response = router()
            .oneshot(bulk_request(&["12가3456", "34나5678"]))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let cars = body.as_array().expect("array body");
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0]["licensePlateNumber"], "12가3456");
        assert!(cars[0]["id"].is_string());
    }

    #[tokio::test]
    async fn bulk_route_rejects_invalid_plates() {
        let response = router()
            .oneshot(bulk_request(&["12가3456", "not-a-plate"]))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn lookup_route_maps_missing_and_malformed_plates() {
        let app = router();

        let missing = app
            .clone()
            .oneshot(
                Request::get("/api/cars/12%EA%B0%803456")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let malformed = app
            .oneshot(Request::get("/api/cars/abc").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    }
}
