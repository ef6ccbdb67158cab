//! End-to-end scenarios for eligibility matching and budget visibility, exercised through
//! the crate's public surface only.

use std::sync::{Arc, Mutex};

use campaign_desk::workflows::campaigns::{
    eligible_applicants, is_eligible, negotiation_enabled, visible_budget, ApplicantProfile,
    Application, ApplicationId, ApplicationRequest, ApplicationStatus, Campaign,
    CampaignDeskService, CampaignId, CampaignPhase, CampaignStatus, DeskSnapshot,
    InMemoryCampaignRepository, InfluencerId, InfluencerVisibility, Notification,
    NotificationError, NotificationPublisher, ReviewDecision, ReviewOutcome,
};
use campaign_desk::workflows::roster::RosterImporter;
use chrono::NaiveDate;

fn campaign_id() -> CampaignId {
    CampaignId("cmp-1".to_string())
}

fn austin_fashion_campaign() -> Campaign {
    Campaign {
        id: campaign_id(),
        title: "Austin fashion week".to_string(),
        min_followers: Some(5000),
        city: Some("Austin".to_string()),
        categories: vec!["fashion".to_string()],
        status: CampaignStatus::Active,
    }
}

fn applicant(id: &str, followers: Option<u32>, categories: &[&str]) -> ApplicantProfile {
    ApplicantProfile {
        db_id: InfluencerId(id.to_string()),
        display_name: id.to_string(),
        follower_count: followers,
        city: Some("Austin".to_string()),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

fn phase(number: u32, amount: u32, active: bool) -> CampaignPhase {
    CampaignPhase {
        campaign_id: campaign_id(),
        phase_number: number,
        budget_amount: amount,
        is_active: active,
    }
}

fn influencer() -> InfluencerId {
    InfluencerId("inf-1".to_string())
}

#[test]
fn matching_profile_is_eligible() {
    let profile = applicant("inf-1", Some(10_000), &["fashion", "travel"]);
    assert!(is_eligible(&austin_fashion_campaign(), &profile));
}

#[test]
fn low_follower_count_is_not_eligible() {
    let profile = applicant("inf-1", Some(3_000), &["fashion"]);
    assert!(!is_eligible(&austin_fashion_campaign(), &profile));
}

#[test]
fn application_budget_is_frozen() {
    let application = Application {
        id: ApplicationId("app-1".to_string()),
        campaign_id: campaign_id(),
        influencer_id: influencer(),
        status: ApplicationStatus::Pending,
        budget_applied_for: Some(2000),
        is_negotiated: false,
        final_offer_amount: None,
        applied_on: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
    };
    let mut row = InfluencerVisibility::new(campaign_id(), influencer());
    row.custom_offer_amount = Some(7000);

    let amount = visible_budget(
        &austin_fashion_campaign(),
        &[phase(1, 1000, true), phase(2, 9000, true)],
        &[row],
        &[application],
        &influencer(),
    );

    assert_eq!(amount, Some(2000));
}

#[test]
fn custom_offer_wins_over_phases() {
    let mut row = InfluencerVisibility::new(campaign_id(), influencer());
    row.custom_offer_amount = Some(5000);

    let amount = visible_budget(
        &austin_fashion_campaign(),
        &[phase(1, 1000, true), phase(2, 2000, true)],
        &[row],
        &[],
        &influencer(),
    );

    assert_eq!(amount, Some(5000));
}

#[test]
fn deleted_assigned_phase_falls_back() {
    let mut row = InfluencerVisibility::new(campaign_id(), influencer());
    row.assigned_phase = Some(3);

    let amount = visible_budget(
        &austin_fashion_campaign(),
        &[phase(1, 1000, true), phase(2, 2000, true)],
        &[row],
        &[],
        &influencer(),
    );

    assert_eq!(amount, Some(2000));
}

#[test]
fn no_active_phase_shows_no_budget() {
    let amount = visible_budget(
        &austin_fashion_campaign(),
        &[phase(1, 1000, false)],
        &[],
        &[],
        &influencer(),
    );

    assert_eq!(amount, None);
    assert!(!negotiation_enabled(&austin_fashion_campaign(), &[], &influencer()));
}

#[test]
fn roster_import_feeds_batch_filter() {
    let csv = "db_id,display_name,follower_count,city,categories\n\
               inf-1,Ada,10000,Austin,fashion;travel\n\
               inf-2,Bo,3000,Austin,fashion\n\
               inf-3,Cy,,,\n\
               inf-4,Di,9000,Dallas,fashion\n";
    let roster = RosterImporter::from_reader(std::io::Cursor::new(csv)).expect("roster parses");

    let eligible = eligible_applicants(&austin_fashion_campaign(), &roster);

    let ids: Vec<&str> = eligible.iter().map(|p| p.db_id.0.as_str()).collect();
    assert_eq!(ids, vec!["inf-1", "inf-3"]);
}

#[derive(Default)]
struct Inbox {
    delivered: Mutex<Vec<Notification>>,
}

impl NotificationPublisher for Inbox {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        self.delivered
            .lock()
            .expect("inbox mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[test]
fn seeded_desk_runs_apply_and_review() {
    let export = r#"{
        "campaigns": [
            {"id": "cmp-1", "title": "Austin fashion week", "min_followers": 5000,
             "city": "Austin", "categories": ["fashion"], "status": "active"}
        ],
        "phases": [
            {"campaign_id": "cmp-1", "phase_number": 1, "budget_amount": 1000, "is_active": true},
            {"campaign_id": "cmp-1", "phase_number": 2, "budget_amount": 2000, "is_active": false}
        ],
        "visibility": [
            {"campaign_id": "cmp-1", "influencer_id": "inf-1", "assigned_phase": 2,
             "negotiation_visible": true}
        ],
        "applicants": [
            {"db_id": "inf-1", "display_name": "Ada", "follower_count": 10000,
             "city": "Austin", "categories": ["fashion"]}
        ]
    }"#;
    let snapshot =
        DeskSnapshot::from_reader(std::io::Cursor::new(export)).expect("export parses");
    let repository =
        Arc::new(InMemoryCampaignRepository::seeded(snapshot).expect("repository seeded"));
    let inbox = Arc::new(Inbox::default());
    let service = CampaignDeskService::new(repository, inbox.clone());

    let quote = service
        .quote(&campaign_id(), &influencer())
        .expect("quote builds");
    assert_eq!(quote.budget.amount, Some(2000));
    assert!(quote.negotiation_enabled);

    let application = service
        .apply(
            &campaign_id(),
            ApplicationRequest {
                influencer_id: influencer(),
                negotiated_amount: Some(2500),
                applied_on: None,
            },
        )
        .expect("application recorded");
    assert!(application.is_negotiated);
    assert_eq!(application.budget_applied_for, Some(2500));

    let reviewed = service
        .review(
            &application.id,
            ReviewDecision {
                outcome: ReviewOutcome::Approve,
                final_offer_amount: Some(2400),
            },
        )
        .expect("review succeeds");
    assert_eq!(reviewed.status, ApplicationStatus::Approved);
    assert_eq!(reviewed.final_offer_amount, Some(2400));

    let delivered = inbox.delivered.lock().expect("inbox mutex poisoned");
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].template, "application_approved");
}
