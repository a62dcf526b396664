use crate::cli::ServeArgs;
use crate::infra::{seed_parking_lots, AppState, Services};
use crate::routes::with_parking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lotkeeper::config::AppConfig;
use lotkeeper::error::AppError;
use lotkeeper::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = Services::in_memory();
    let seeded = seed_parking_lots(services.parking.as_ref(), &config.parking.seed_lots)?;

    let app = with_parking_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seeded_lots = seeded, "parking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
