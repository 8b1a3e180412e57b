use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::calculation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use land_use::config::AppConfig;
use land_use::error::AppError;
use land_use::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        defaults: config.calculator,
    };

    let app = calculation_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        incentive = config.calculator.apply_efficiency_incentive,
        rounding = ?config.calculator.rounding,
        "land-use calculator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
