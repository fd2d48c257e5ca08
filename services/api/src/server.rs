use crate::cli::ServeArgs;
use crate::infra::{load_engine, load_provider, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use esg_advisor::assessment::AssessmentState;
use esg_advisor::config::AppConfig;
use esg_advisor::error::AppError;
use esg_advisor::spatial::LocationContextProvider;
use esg_advisor::telemetry;
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

    let engine = Arc::new(load_engine(&config.scoring)?);
    let locations: Option<Arc<dyn LocationContextProvider + Send + Sync>> =
        if config.spatial.is_configured() {
            Some(Arc::new(load_provider(&config.spatial)?))
        } else {
            info!("spatial datasets not configured; location lookups disabled");
            None
        };

    let app = with_assessment_routes(AssessmentState { engine, locations })
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "esg advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
