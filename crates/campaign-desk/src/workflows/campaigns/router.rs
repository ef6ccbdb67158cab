use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, CampaignId, InfluencerId, InfluencerVisibility};
use super::repository::{
    ApplicationStatusView, CampaignRepository, NotificationPublisher, RepositoryError,
};
use super::service::{
    ApplicationRequest, CampaignDeskService, CampaignServiceError, ReviewDecision,
};

/// Visibility override body; the campaign comes from the path.
#[derive(Debug, Deserialize)]
pub(crate) struct VisibilityRequest {
    pub(crate) influencer_id: InfluencerId,
    #[serde(default)]
    pub(crate) assigned_phase: Option<u32>,
    #[serde(default)]
    pub(crate) negotiation_visible: bool,
    #[serde(default)]
    pub(crate) custom_offer_amount: Option<u32>,
}

/// Router builder exposing the campaign desk over HTTP.
pub fn campaign_router<R, N>(service: Arc<CampaignDeskService<R, N>>) -> Router
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/campaigns/:campaign_id/eligible-applicants",
            get(eligible_applicants_handler::<R, N>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/budget/:influencer_id",
            get(quote_handler::<R, N>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/applications",
            post(apply_handler::<R, N>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/visibility",
            put(visibility_handler::<R, N>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/visibility/clear-stale",
            post(clear_stale_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/review",
            post(review_handler::<R, N>),
        )
        .route(
            "/api/v1/influencers/:influencer_id/eligible-campaigns",
            get(eligible_campaigns_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn eligible_applicants_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.eligible_applicants(&CampaignId(campaign_id)) {
        Ok(applicants) => (StatusCode::OK, Json(applicants)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quote_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path((campaign_id, influencer_id)): Path<(String, String)>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.quote(&CampaignId(campaign_id), &InfluencerId(influencer_id)) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn apply_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path(campaign_id): Path<String>,
    Json(request): Json<ApplicationRequest>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.apply(&CampaignId(campaign_id), request) {
        Ok(application) => {
            let view = ApplicationStatusView::from(&application);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn visibility_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path(campaign_id): Path<String>,
    Json(request): Json<VisibilityRequest>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let row = InfluencerVisibility {
        campaign_id: CampaignId(campaign_id),
        influencer_id: request.influencer_id,
        assigned_phase: request.assigned_phase,
        negotiation_visible: request.negotiation_visible,
        custom_offer_amount: request.custom_offer_amount,
    };
    match service.upsert_visibility(row) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_stale_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path(campaign_id): Path<String>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.clear_stale_assignments(&CampaignId(campaign_id)) {
        Ok(cleared) => (StatusCode::OK, Json(json!({ "cleared": cleared }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligible_campaigns_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path(influencer_id): Path<String>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.eligible_campaigns(&InfluencerId(influencer_id)) {
        Ok(campaigns) => (StatusCode::OK, Json(campaigns)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<CampaignDeskService<R, N>>>,
    Path(application_id): Path<String>,
    Json(decision): Json<ReviewDecision>,
) -> Response
where
    R: CampaignRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.review(&ApplicationId(application_id), decision) {
        Ok(application) => {
            let view = ApplicationStatusView::from(&application);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

impl CampaignServiceError {
    /// HTTP status reported for this error by every desk surface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CampaignServiceError::Ineligible(_) | CampaignServiceError::NegotiationUnavailable => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CampaignServiceError::AlreadyReviewed { .. }
            | CampaignServiceError::Repository(
                RepositoryError::Conflict | RepositoryError::StatusChanged { .. },
            ) => StatusCode::CONFLICT,
            CampaignServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            CampaignServiceError::Repository(RepositoryError::Unavailable(_))
            | CampaignServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn error_response(err: CampaignServiceError) -> Response {
    let status = err.status_code();

    let payload = match &err {
        CampaignServiceError::Ineligible(reason) => json!({
            "error": err.to_string(),
            "reason": reason,
        }),
        _ => json!({ "error": err.to_string() }),
    };
    (status, Json(payload)).into_response()
}
