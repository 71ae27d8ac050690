use crate::cli::ServeArgs;
use crate::infra::{seed_sample_data, AppState};
use crate::routes::with_welfare_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use smart_graama::config::AppConfig;
use smart_graama::error::AppError;
use smart_graama::telemetry;
use smart_graama::welfare::{InMemoryWelfareStore, TokenVerifier, WelfareService};
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

    let store = Arc::new(InMemoryWelfareStore::default());
    let welfare_service = Arc::new(WelfareService::new(store, config.welfare));
    let identity = Arc::new(TokenVerifier::new(&config.identity));

    if args.seed {
        let seeded = seed_sample_data(&*welfare_service)?;
        info!(
            schemes = seeded.schemes.len(),
            residents = seeded.residents.len(),
            "sample panchayat data loaded"
        );
    }

    let app = with_welfare_routes(welfare_service, identity)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        enforce_eligibility = config.welfare.enforce_eligibility_on_apply,
        "smart graama welfare service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
