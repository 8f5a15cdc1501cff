use crate::cli::ServeArgs;
use crate::infra::{
    default_category_rows, default_scoring_config, sample_appliances, sample_tickets, AppState,
    InMemoryApplianceRepository, InMemoryAssessmentRepository, InMemoryCategoryCatalog,
    InMemoryRepairLedger, InMemoryReviewQueue,
};
use crate::routes::with_viability_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mortify::config::AppConfig;
use mortify::error::AppError;
use mortify::telemetry;
use mortify::workflows::catalog::{CategoryBook, CategoryReferenceImporter};
use mortify::workflows::viability::ViabilityService;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let ServeArgs {
        host,
        port,
        categories_csv,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let book = load_catalog(categories_csv)?;
    let service = Arc::new(ViabilityService::new(
        seeded_appliances(),
        Arc::new(InMemoryCategoryCatalog::new(book)),
        seeded_ledger(),
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryReviewQueue::default()),
        default_scoring_config(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness = Arc::new(AtomicBool::new(false));
    let app = with_viability_routes(service)
        .layer(Extension(AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(prometheus_handle),
        }))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "viability judge ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_catalog(categories_csv: Option<PathBuf>) -> Result<CategoryBook, AppError> {
    match categories_csv {
        Some(path) => {
            let book = CategoryReferenceImporter::from_path(&path)?;
            info!(path = %path.display(), categories = book.len(), "category reference imported");
            Ok(book)
        }
        None => Ok(CategoryBook::new(default_category_rows())),
    }
}

fn seeded_appliances() -> Arc<InMemoryApplianceRepository> {
    let repo = Arc::new(InMemoryApplianceRepository::default());
    for appliance in sample_appliances() {
        repo.seed(appliance);
    }
    repo
}

fn seeded_ledger() -> Arc<InMemoryRepairLedger> {
    let repo = Arc::new(InMemoryRepairLedger::default());
    for ticket in sample_tickets() {
        repo.seed(ticket);
    }
    repo
}
