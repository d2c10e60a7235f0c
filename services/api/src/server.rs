use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use grievance_desk::config::AppConfig;
use grievance_desk::error::AppError;
use grievance_desk::registry::{ComplaintRegistry, KeywordClassifier};
use grievance_desk::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryComplaintRepository};
use crate::routes::with_registry_routes;

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

    let repository = Arc::new(InMemoryComplaintRepository::default());
    let registry = Arc::new(ComplaintRegistry::new(
        repository,
        Arc::new(KeywordClassifier),
        config.intake.policy(),
    ));

    let app = with_registry_routes(registry)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grievance desk registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
