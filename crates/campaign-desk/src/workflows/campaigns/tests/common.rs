use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::campaigns::domain::{
    ApplicantProfile, Application, ApplicationId, ApplicationStatus, Campaign, CampaignId,
    CampaignPhase, CampaignStatus, InfluencerId, InfluencerVisibility, Notification,
};
use crate::workflows::campaigns::repository::{
    CampaignRepository, InMemoryCampaignRepository, NotificationError, NotificationPublisher,
};
use crate::workflows::campaigns::service::CampaignDeskService;

pub(super) fn campaign_id() -> CampaignId {
    CampaignId("cmp-austin-fashion".to_string())
}

pub(super) fn influencer(id: &str) -> InfluencerId {
    InfluencerId(id.to_string())
}

/// Active Austin fashion campaign requiring 5000 followers.
pub(super) fn campaign() -> Campaign {
    Campaign {
        id: campaign_id(),
        title: "Austin spring fashion".to_string(),
        min_followers: Some(5000),
        city: Some("Austin".to_string()),
        categories: vec!["fashion".to_string()],
        status: CampaignStatus::Active,
    }
}

pub(super) fn open_campaign() -> Campaign {
    Campaign {
        id: CampaignId("cmp-open".to_string()),
        title: "Open call".to_string(),
        min_followers: None,
        city: None,
        categories: Vec::new(),
        status: CampaignStatus::Active,
    }
}

pub(super) fn profile(
    id: &str,
    followers: Option<u32>,
    city: Option<&str>,
    categories: &[&str],
) -> ApplicantProfile {
    ApplicantProfile {
        db_id: influencer(id),
        display_name: format!("Influencer {id}"),
        follower_count: followers,
        city: city.map(str::to_string),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

pub(super) fn phase(number: u32, amount: u32, active: bool) -> CampaignPhase {
    CampaignPhase {
        campaign_id: campaign_id(),
        phase_number: number,
        budget_amount: amount,
        is_active: active,
    }
}

pub(super) fn visibility(id: &str) -> InfluencerVisibility {
    InfluencerVisibility::new(campaign_id(), influencer(id))
}

pub(super) fn application(id: &str, budget: Option<u32>) -> Application {
    Application {
        id: ApplicationId(format!("app-{id}")),
        campaign_id: campaign_id(),
        influencer_id: influencer(id),
        status: ApplicationStatus::Pending,
        budget_applied_for: budget,
        is_negotiated: false,
        final_offer_amount: None,
        applied_on: applied_on(),
    }
}

pub(super) fn applied_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date")
}

/// Two active phases (1000, 2000) and one inactive phase 5 (9000).
pub(super) fn tiered_phases() -> Vec<CampaignPhase> {
    vec![
        phase(1, 1000, true),
        phase(2, 2000, true),
        phase(5, 9000, false),
    ]
}

/// Repository holding `campaign()`, its tiered phases, and three applicants:
/// `inf-ada` (eligible), `inf-bo` (too few followers), `inf-cy` (unknown data, eligible).
pub(super) fn seeded_repository() -> Arc<InMemoryCampaignRepository> {
    let repository = Arc::new(InMemoryCampaignRepository::default());
    repository
        .insert_campaign(campaign())
        .expect("campaign inserted");
    for phase in tiered_phases() {
        repository.upsert_phase(phase).expect("phase stored");
    }
    for profile in [
        profile("inf-ada", Some(10_000), Some("Austin"), &["fashion", "travel"]),
        profile("inf-bo", Some(3_000), Some("Austin"), &["fashion"]),
        profile("inf-cy", None, None, &[]),
    ] {
        repository.upsert_applicant(profile).expect("applicant stored");
    }
    repository
}

pub(super) fn build_service() -> (
    CampaignDeskService<InMemoryCampaignRepository, MemoryNotifications>,
    Arc<InMemoryCampaignRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = seeded_repository();
    let notifications = Arc::new(MemoryNotifications::default());
    let service = CampaignDeskService::new(repository.clone(), notifications.clone());
    (service, repository, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifications;

impl NotificationPublisher for OfflineNotifications {
    fn publish(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

/// Fails the first `failures` deliveries, then records like `MemoryNotifications`.
pub(super) struct FlakyNotifications {
    failures: AtomicUsize,
    delivered: MemoryNotifications,
}

impl FlakyNotifications {
    pub(super) fn failing_once() -> Self {
        Self {
            failures: AtomicUsize::new(1),
            delivered: MemoryNotifications::default(),
        }
    }

    pub(super) fn events(&self) -> Vec<Notification> {
        self.delivered.events()
    }
}

impl NotificationPublisher for FlakyNotifications {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(NotificationError::Transport("mailer timed out".to_string()));
        }
        self.delivered.publish(notification)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
