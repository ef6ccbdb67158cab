use crate::cli::ServeArgs;
use crate::infra::{load_repository, AppState, LoggingNotificationPublisher};
use crate::routes::with_desk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campaign_desk::config::AppConfig;
use campaign_desk::error::AppError;
use campaign_desk::telemetry;
use campaign_desk::workflows::campaigns::CampaignDeskService;
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

    let repository = Arc::new(load_repository(&config.data)?);
    let notifications = Arc::new(LoggingNotificationPublisher::default());
    let service = Arc::new(CampaignDeskService::new(repository, notifications));

    let app = with_desk_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campaign desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
