use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use campaign_desk::workflows::campaigns::{
    campaign_router, CampaignDeskService, CampaignRepository, NotificationPublisher,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_desk_routes<R, N>(service: Arc<CampaignDeskService<R, N>>) -> axum::Router
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    campaign_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{sample_desk, LoggingNotificationPublisher};
    use axum::body::Body;
    use axum::http::Request;
    use campaign_desk::workflows::campaigns::InMemoryCampaignRepository;
    use tower::ServiceExt;

    fn desk_app() -> axum::Router {
        let repository =
            InMemoryCampaignRepository::seeded(sample_desk()).expect("sample desk seeds");
        let service = CampaignDeskService::new(
            Arc::new(repository),
            Arc::new(LoggingNotificationPublisher::default()),
        );
        with_desk_routes(Arc::new(service))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn desk_routes_serve_quotes_for_sample_desk() {
        let response = desk_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/campaigns/cmp-spring-fashion/budget/inf-ada")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json payload");
        assert_eq!(body["budget"]["amount"], 5000);
        assert_eq!(body["budget"]["source"]["rule"], "custom_offer");
    }

    #[tokio::test]
    async fn health_route_is_mounted_next_to_desk_routes() {
        let response = desk_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
