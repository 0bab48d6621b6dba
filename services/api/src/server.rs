use crate::cli::ServeArgs;
use crate::infra::{
    default_category_rules, sample_candidates, sample_courses, AppState,
    InMemoryAdmissionRepository, InMemoryPublicationGate, InMemoryRulesStore,
};
use crate::routes::with_admission_routes;
use admission_core::allocation::AllocationService;
use admission_core::config::AppConfig;
use admission_core::error::AppError;
use admission_core::telemetry;
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

    let repository = Arc::new(InMemoryAdmissionRepository::seeded(
        sample_candidates(),
        sample_courses(),
    ));
    let rules = Arc::new(InMemoryRulesStore::with_rules(default_category_rules()));
    let gate = Arc::new(InMemoryPublicationGate::default());
    let allocation_service = Arc::new(AllocationService::new(repository, rules, gate));

    let app = with_admission_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
