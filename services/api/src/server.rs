use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAidCatalog};
use crate::routes::with_matching_routes;
use agri_match::config::AppConfig;
use agri_match::error::AppError;
use agri_match::matching::{BatchRanker, MatchingService};
use agri_match::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let catalog = match &config.matching.catalog_path {
        Some(path) => {
            let catalog = InMemoryAidCatalog::from_path(path)?;
            info!(path = %path.display(), aids = catalog.len(), "aid catalog loaded");
            catalog
        }
        None => {
            warn!("AID_CATALOG_PATH not set, requests must supply their own aids");
            InMemoryAidCatalog::default()
        }
    };
    let matching_service = Arc::new(MatchingService::new(
        Arc::new(catalog),
        BatchRanker::new(config.matching.parallel),
        config.matching.top_n,
    ));

    let app = with_matching_routes(matching_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "aid matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
