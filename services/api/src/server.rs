use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_enrollment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use classroom_planner::config::AppConfig;
use classroom_planner::error::AppError;
use classroom_planner::telemetry;
use classroom_planner::workflows::enrollment::EnrollmentPlanner;
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

    let planner = Arc::new(EnrollmentPlanner::new(config.planner));

    let app = with_enrollment_routes(planner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        capacity = ?config.planner.capacity.values(),
        horizon_months = config.planner.horizon_months,
        "classroom planner ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
