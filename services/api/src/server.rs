use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository, LoggingAuthGateway};
use crate::routes::with_registration_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mentor_match::config::AppConfig;
use mentor_match::error::AppError;
use mentor_match::telemetry;
use mentor_match::workflows::registration::{
    FileSnapshotSink, HttpRegistrationClient, NominatimClient, RegistrationService,
    RegistrationServiceError,
};
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

    let geocoder =
        NominatimClient::from_config(&config.geocoding).map_err(RegistrationServiceError::from)?;
    let registrar = HttpRegistrationClient::from_config(&config.registration)
        .map_err(RegistrationServiceError::from)?;
    let registration_service = Arc::new(RegistrationService::new(
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(geocoder),
        Arc::new(registrar),
        Box::new(FileSnapshotSink::new(config.snapshots.dir.clone())),
        Box::new(LoggingAuthGateway),
    ));

    let app = with_registration_routes(registration_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "registration intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
