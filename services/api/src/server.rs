use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState};
use crate::routes::with_placement_routes;
use akili_pathways::config::AppConfig;
use akili_pathways::error::AppError;
use akili_pathways::telemetry;
use akili_pathways::workflows::placement::PlacementEngine;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let directory = Arc::new(load_directory(&config.directory)?);
    let engine = Arc::new(PlacementEngine::new(directory, config.placement));

    let app = with_placement_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        failure_policy = ?config.placement.failure_policy,
        "placement service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
