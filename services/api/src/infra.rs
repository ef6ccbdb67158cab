use campaign_desk::config::DataConfig;
use campaign_desk::error::AppError;
use campaign_desk::workflows::campaigns::{
    ApplicantProfile, Campaign, CampaignId, CampaignPhase, CampaignStatus, DeskSnapshot,
    InMemoryCampaignRepository, InfluencerId, InfluencerVisibility, Notification,
    NotificationError, NotificationPublisher,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Notification sink that logs each delivery and keeps it for inspection.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotificationPublisher {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationPublisher for LoggingNotificationPublisher {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        info!(
            recipient = %notification.recipient.0,
            template = %notification.template,
            campaign = %notification.campaign_id.0,
            "notification queued"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("outbox mutex poisoned".to_string()))?;
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Seed the in-memory desk from the configured snapshot, or start empty.
pub(crate) fn load_repository(data: &DataConfig) -> Result<InMemoryCampaignRepository, AppError> {
    match &data.snapshot_path {
        Some(path) => {
            let snapshot = DeskSnapshot::from_path(path)?;
            info!(
                path = %path.display(),
                campaigns = snapshot.campaigns.len(),
                applicants = snapshot.applicants.len(),
                "seeding campaign desk from snapshot"
            );
            Ok(InMemoryCampaignRepository::seeded(snapshot)?)
        }
        None => Ok(InMemoryCampaignRepository::default()),
    }
}

/// Small desk used by the demo command: one active campaign with two budget tiers.
pub(crate) fn sample_desk() -> DeskSnapshot {
    let campaign_id = CampaignId("cmp-spring-fashion".to_string());
    let phase = |phase_number, budget_amount, is_active| CampaignPhase {
        campaign_id: campaign_id.clone(),
        phase_number,
        budget_amount,
        is_active,
    };
    let mut vip =
        InfluencerVisibility::new(campaign_id.clone(), InfluencerId("inf-ada".to_string()));
    vip.custom_offer_amount = Some(5000);
    let mut negotiator =
        InfluencerVisibility::new(campaign_id.clone(), InfluencerId("inf-cy".to_string()));
    negotiator.negotiation_visible = true;
    negotiator.assigned_phase = Some(1);

    DeskSnapshot {
        campaigns: vec![Campaign {
            id: campaign_id.clone(),
            title: "Spring fashion drop".to_string(),
            min_followers: Some(5000),
            city: Some("Austin".to_string()),
            categories: vec!["fashion".to_string(), "lifestyle".to_string()],
            status: CampaignStatus::Active,
        }],
        phases: vec![phase(1, 1000, true), phase(2, 2000, true), phase(3, 3500, false)],
        visibility: vec![vip, negotiator],
        applicants: vec![
            sample_profile("inf-ada", Some(48_000), Some("Austin"), &["fashion", "travel"]),
            sample_profile("inf-bo", Some(3_200), Some("Austin"), &["fashion"]),
            sample_profile("inf-cy", None, Some("Austin"), &["lifestyle"]),
            sample_profile("inf-di", Some(15_000), Some("Dallas"), &["fashion"]),
        ],
        applications: Vec::new(),
    }
}

fn sample_profile(
    id: &str,
    followers: Option<u32>,
    city: Option<&str>,
    categories: &[&str],
) -> ApplicantProfile {
    ApplicantProfile {
        db_id: InfluencerId(id.to_string()),
        display_name: id.trim_start_matches("inf-").to_string(),
        follower_count: followers,
        city: city.map(str::to_string),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}
