use crate::cli::ServeArgs;
use crate::infra::{load_store, AppState, TracingNotifier};
use crate::routes::with_matching_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use volunteer_match::config::AppConfig;
use volunteer_match::error::AppError;
use volunteer_match::matching::MatchingService;
use volunteer_match::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.volunteers.take() {
        config.roster.volunteers_csv = Some(path);
    }
    if let Some(path) = args.events.take() {
        config.roster.events_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(load_store(
        config.roster.volunteers_csv.as_deref(),
        config.roster.events_csv.as_deref(),
    )?);
    let matching_service = Arc::new(MatchingService::new(store, Arc::new(TracingNotifier)));

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "volunteer matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
